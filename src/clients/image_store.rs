//! Almacén de imágenes
//!
//! Las fotos se guardan con clave estable por RO (`<folder>/RO-<ro>`) y
//! se sobrescriben en cada subida.

use std::collections::HashMap;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use tokio::sync::RwLock;
use tracing::info;

use crate::utils::errors::AppResult;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Subir (sobrescribiendo) y devolver la URL pública
    async fn upload(&self, bytes: Vec<u8>, mime_type: &str, folder: &str, key: &str) -> AppResult<String>;

    /// Eliminar por public_id; una imagen inexistente no es un error
    async fn delete(&self, public_id: &str) -> AppResult<()>;
}

lazy_static! {
    static ref PUBLIC_ID_RE: Regex =
        Regex::new(r"(?i)/upload/(?:v\d+/)?(.+?)\.(jpg|jpeg|png|webp|gif)$").expect("valid regex");
}

/// Extraer el public_id de una URL de entrega
/// (`.../image/upload/v123/folder/RO-4355.jpg` -> `folder/RO-4355`)
pub fn extract_public_id(url: &str) -> Option<String> {
    PUBLIC_ID_RE
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extensión de archivo a partir del mime type
pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type.trim().to_lowercase().as_str() {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

/// Almacén de imágenes en memoria (modo demo y tests)
#[derive(Default)]
pub struct InMemoryImageStore {
    images: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, public_id: &str) -> bool {
        self.images.read().await.contains_key(public_id)
    }

    pub async fn is_empty(&self) -> bool {
        self.images.read().await.is_empty()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn upload(&self, bytes: Vec<u8>, mime_type: &str, folder: &str, key: &str) -> AppResult<String> {
        let public_id = format!("{}/{}", folder, key);
        let url = format!(
            "memory://images/upload/{}.{}",
            public_id,
            extension_for(mime_type)
        );
        self.images.write().await.insert(public_id, bytes);
        Ok(url)
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        if self.images.write().await.remove(public_id).is_none() {
            info!("Imagen {} no encontrada (puede haber sido eliminada ya)", public_id);
        }
        Ok(())
    }
}

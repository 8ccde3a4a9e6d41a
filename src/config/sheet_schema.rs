//! Descriptor estático del esquema de la hoja de cálculo
//!
//! Cada pestaña declara qué campos lógicos espera y con qué encabezados
//! puede aparecer cada uno. Los índices de columna se resuelven a partir
//! de la fila de encabezados; los campos requeridos ausentes son un error
//! de configuración.

use std::collections::HashMap;

use crate::utils::errors::{configuration_error, AppResult};

/// Campos lógicos conocidos por el sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    RoNumber,
    CredentialToken,
    StatusText,
    LifecycleTag,
    PhotoUrl,
    PhotoTimestamp,
    ClientName,
    Insurance,
    ClaimNumber,
    VehicleDescription,
    Vin,
    Phone,
    Email,
    StatusLabel,
    PortalMessage,
}

/// Regla de coincidencia de un encabezado (siempre sin mayúsculas y recortado)
#[derive(Debug, Clone, Copy)]
pub enum HeaderMatch {
    Exact(&'static str),
    Contains(&'static str),
}

impl HeaderMatch {
    fn matches(&self, normalized_header: &str) -> bool {
        match self {
            HeaderMatch::Exact(alias) => normalized_header == *alias,
            HeaderMatch::Contains(fragment) => normalized_header.contains(fragment),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub aliases: &'static [HeaderMatch],
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct TabSchema {
    pub tab: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Encabezados que se crean al aprovisionar las columnas de fotos
pub const PHOTO_URL_HEADER: &str = "PHOTO_URL";
pub const PHOTO_DATE_HEADER: &str = "PHOTO_DATE";

/// Tabla de autenticación (una fila por RO)
pub const AUTH_TAB: TabSchema = TabSchema {
    tab: "allvehiclesmonday",
    fields: &[
        FieldSpec { field: Field::RoNumber, aliases: &[HeaderMatch::Exact("ro")], required: true },
        FieldSpec {
            field: Field::CredentialToken,
            aliases: &[HeaderMatch::Exact("monday_item_id")],
            required: true,
        },
        FieldSpec { field: Field::StatusText, aliases: &[HeaderMatch::Exact("updates")], required: false },
        FieldSpec {
            field: Field::LifecycleTag,
            aliases: &[HeaderMatch::Exact("group"), HeaderMatch::Exact("tag"), HeaderMatch::Exact("lifecycle")],
            required: false,
        },
        FieldSpec {
            field: Field::PhotoUrl,
            aliases: &[HeaderMatch::Exact("photo_url"), HeaderMatch::Exact("photourl"), HeaderMatch::Exact("photo url")],
            required: false,
        },
        FieldSpec {
            field: Field::PhotoTimestamp,
            aliases: &[HeaderMatch::Exact("photo_date"), HeaderMatch::Exact("photodate"), HeaderMatch::Exact("photo date")],
            required: false,
        },
    ],
};

/// Perfil del cliente; todas las columnas son opcionales
pub const CUSTOMER_TAB: TabSchema = TabSchema {
    tab: "customer-info",
    fields: &[
        FieldSpec { field: Field::RoNumber, aliases: &[HeaderMatch::Exact("ro")], required: false },
        FieldSpec { field: Field::ClientName, aliases: &[HeaderMatch::Exact("customer")], required: false },
        FieldSpec { field: Field::Insurance, aliases: &[HeaderMatch::Exact("insurance")], required: false },
        FieldSpec { field: Field::ClaimNumber, aliases: &[HeaderMatch::Exact("claim")], required: false },
        FieldSpec { field: Field::VehicleDescription, aliases: &[HeaderMatch::Exact("vehicle")], required: false },
        FieldSpec { field: Field::Vin, aliases: &[HeaderMatch::Exact("vin")], required: false },
        FieldSpec { field: Field::Phone, aliases: &[HeaderMatch::Contains("phone")], required: false },
        FieldSpec { field: Field::Email, aliases: &[HeaderMatch::Exact("email")], required: false },
    ],
};

/// Mensajes por estado
pub const STATUS_TAB: TabSchema = TabSchema {
    tab: "updatelist",
    fields: &[
        FieldSpec { field: Field::StatusLabel, aliases: &[HeaderMatch::Exact("status")], required: true },
        FieldSpec { field: Field::PortalMessage, aliases: &[HeaderMatch::Exact("portal")], required: true },
    ],
};

/// Índices resueltos de una pestaña
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    indices: HashMap<Field, usize>,
    width: usize,
}

impl ColumnMap {
    pub fn index_of(&self, field: Field) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn has(&self, field: Field) -> bool {
        self.indices.contains_key(&field)
    }

    /// Número de celdas en la fila de encabezados
    pub fn width(&self) -> usize {
        self.width
    }

    /// Celda recortada de una fila; vacía si la columna o la celda no existen
    pub fn cell<'a>(&self, row: &'a [String], field: Field) -> &'a str {
        self.index_of(field)
            .and_then(|idx| row.get(idx))
            .map(|v| v.trim())
            .unwrap_or("")
    }
}

impl TabSchema {
    /// Resolver los índices a partir de la fila de encabezados
    pub fn resolve(&self, headers: &[String]) -> AppResult<ColumnMap> {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let mut indices = HashMap::new();

        for column in self.fields {
            let found = normalized
                .iter()
                .position(|header| column.aliases.iter().any(|alias| alias.matches(header)));

            match found {
                Some(idx) => {
                    indices.insert(column.field, idx);
                }
                None if column.required => {
                    return Err(configuration_error(format!(
                        "Required column {:?} not found in tab '{}'",
                        column.field, self.tab
                    )));
                }
                None => {}
            }
        }

        Ok(ColumnMap { indices, width: headers.len() })
    }

    /// Campos opcionales ausentes (para avisos en el arranque)
    pub fn missing_optional(&self, columns: &ColumnMap) -> Vec<Field> {
        self.fields
            .iter()
            .filter(|column| !column.required && !columns.has(column.field))
            .map(|column| column.field)
            .collect()
    }
}

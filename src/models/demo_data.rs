//! Datos de demostración
//!
//! Con `DEMO_MODE=true` el almacén en memoria se siembra con estas filas
//! para probar el portal sin credenciales de Google.

use crate::clients::InMemoryTabularStore;
use crate::config::sheet_schema::{AUTH_TAB, CUSTOMER_TAB, STATUS_TAB};

const AUTH_ROWS: &[&[&str]] = &[
    &["RO", "Monday_Item_ID", "UPDATES", "GROUP"],
    &["DEMO001", "demo123", "Vehicle Received", ""],
    &["DEMO002", "demo456", "Work in Progress", ""],
    &["DEMO003", "demo789", "Ready for Pickup", ""],
    &["DEMO004", "demo101", "Awaiting Approval", ""],
    &["DEMO005", "demo202", "Awaiting Parts", ""],
    &["DEMO006", "demo303", "Paint in Progress", ""],
    &["DEMO007", "demo404", "Quality Control", "delivered"],
    &["DEMO008", "demo505", "Disassembly & Assessment", "leads"],
];

const CUSTOMER_ROWS: &[&[&str]] = &[
    &["RO", "CUSTOMER", "INSURANCE", "CLAIM", "VEHICLE", "VIN", "CUSTOMER PHONE", "EMAIL"],
    &["DEMO001", "John Smith", "PLYMOUTH ROCK ASSURANCE", "657002676670", "2020 Honda Civic EX 4D Sedan", "1HGBH41JXMN109186", "(978) 123-4567", "john@example.com"],
    &["DEMO002", "Maria Santos", "GEICO", "789012345678", "2019 Honda Odyssey EX-L 4D Minivan", "5FNRL6H78KB019843", "(978) 234-5678", "maria@example.com"],
    &["DEMO003", "Peter Johnson", "STATE FARM", "456789012345", "2021 Honda Accord Sport 4D Sedan", "2HGFC2F59LH543210", "(978) 345-6789", "peter@example.com"],
    &["DEMO004", "Ana Ferreira", "PROGRESSIVE", "321654987012", "2022 Ford F-150 XLT 4WD SuperCrew", "1FTFW1ET5EFA12345", "(978) 456-7890", "ana@example.com"],
    &["DEMO005", "Carlos Mendes", "ALLSTATE", "147258369012", "2018 Chevrolet Corvette Stingray 2D Coupe", "1G1YY22G8P5123456", "(978) 567-8901", "carlos@example.com"],
    &["DEMO006", "Julia Costa", "LIBERTY MUTUAL", "963852741012", "2023 Tesla Model S Long Range AWD", "5YJSA1E14FF123456", "(978) 678-9012", "julia@example.com"],
    &["DEMO007", "Robert Souza", "NATIONWIDE", "852963741012", "2021 Jeep Wrangler Unlimited Sahara", "1C4RJFBG0FC123456", "(978) 789-0123", "robert@example.com"],
    &["DEMO008", "Fernanda Pereira", "TRAVELERS", "741852963012", "2020 BMW X5 xDrive40i 4D SUV", "WBAJE5C50FCF12345", "(978) 890-1234", "fernanda@example.com"],
];

const STATUS_ROWS: &[&[&str]] = &[
    &["STATUS", "PORTAL"],
    &["Vehicle Received", "Your vehicle has been received and is being inspected by our team. We will contact you soon with details about the repair process."],
    &["Work in Progress", "We are actively working on repairing your vehicle. We will keep you updated on the progress regularly."],
    &["Ready for Pickup", "Great news! Your vehicle is ready for pickup. Please contact us to schedule a convenient time."],
    &["Awaiting Approval", "We have completed the inspection and sent the estimate. We are awaiting insurance approval to begin repairs."],
    &["Awaiting Parts", "Repairs have begun, but we are waiting for some parts to arrive. We will resume work as soon as they are received."],
    &["Paint in Progress", "Your vehicle is in the paint stage. This process requires proper drying time to ensure a perfect result."],
    &["Quality Control", "Repairs are complete and your vehicle is going through our final quality inspection."],
];

/// Sembrar un almacén en memoria con las tres pestañas de demostración
pub async fn seeded_store() -> InMemoryTabularStore {
    InMemoryTabularStore::new()
        .with_tab(AUTH_TAB.tab, AUTH_ROWS)
        .await
        .with_tab(CUSTOMER_TAB.tab, CUSTOMER_ROWS)
        .await
        .with_tab(STATUS_TAB.tab, STATUS_ROWS)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::TabularStore;

    #[tokio::test]
    async fn test_seeded_tabs_match_schema() {
        let store = seeded_store().await;
        for schema in [AUTH_TAB, CUSTOMER_TAB, STATUS_TAB] {
            let rows = store.read_tab(schema.tab).await.unwrap();
            assert!(schema.resolve(&rows[0]).is_ok(), "tab {}", schema.tab);
        }
    }
}

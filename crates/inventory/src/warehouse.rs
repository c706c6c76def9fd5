use serde::{Deserialize, Serialize};

use invsight_core::{Entity, WarehouseCode};

/// A storage location. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub code: WarehouseCode,
    pub name: String,
    pub city: String,
    pub country: String,
}

impl Warehouse {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            code: WarehouseCode::new(code),
            name: name.into(),
            city: city.into(),
            country: country.into(),
        }
    }
}

impl Entity for Warehouse {
    type Id = WarehouseCode;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

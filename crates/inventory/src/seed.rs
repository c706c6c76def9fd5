//! Demo fixture used to initialise a catalog.

use crate::product::Product;
use crate::warehouse::Warehouse;

pub fn seed_warehouses() -> Vec<Warehouse> {
    vec![
        Warehouse::new("BLR-A", "Bangalore Warehouse A", "Bangalore", "India"),
        Warehouse::new("PNQ-C", "Pune Warehouse C", "Pune", "India"),
        Warehouse::new("DEL-B", "Delhi Warehouse B", "Delhi", "India"),
    ]
}

pub fn seed_products() -> Vec<Product> {
    vec![
        Product::new("P-1001", "12mm Hex Bolt", "HEX-12-100", "BLR-A", 180, 120),
        Product::new("P-1002", "Steel Washer", "WSR-08-500", "BLR-A", 50, 80),
        Product::new("P-1003", "M8 Nut", "NUT-08-200", "PNQ-C", 80, 80),
        Product::new("P-1004", "Bearing 608ZZ", "BRG-608-50", "DEL-B", 24, 120),
        Product::new("P-1005", "Steel Rod 10mm", "ROD-10-300", "BLR-A", 200, 150),
        Product::new("P-1006", "Rubber Gasket", "GSK-RB-100", "PNQ-C", 30, 30),
        Product::new("P-1007", "Aluminum Plate", "PLT-AL-200", "DEL-B", 45, 60),
        Product::new("P-1008", "Spring Coil", "SPR-CL-50", "BLR-A", 100, 90),
        Product::new("P-1009", "Copper Wire", "WR-CP-500", "PNQ-C", 15, 40),
        Product::new("P-1010", "Plastic Cover", "CVR-PL-100", "DEL-B", 75, 55),
        Product::new("P-1011", "Stainless Screw", "SCR-SS-250", "BLR-A", 120, 140),
        Product::new("P-1012", "Ceramic Insulator", "INS-CR-75", "PNQ-C", 35, 35),
    ]
}

//! PartBin import scenarios
//!
//! End-to-end runs of the import engine over small native exports and
//! marketplace orders, through the crate's public API only.

use partbin_models::{Category, Specifications};
use partbin_utils::{Dialect, ImportEngine, ImportFormat, ImportSource, PartbinError};

const NATIVE_EXPORT: &str = "\u{feff}ID,Name,Description,Category,Quantity,Location,Min Stock Level,Specifications\r\n\
    c-001,C1525,\"10nF ±10% 50V X7R\",Capacitors,200,Drawer 3,20,\r\n\
    r-001,RC0603,\"10kΩ ±5% 1/4W\",Resistors,1000,Drawer 1,100,\r\n\
    s-001,SW-6x6,Tactile switch,Switches,25,Drawer 7,,\r\n";

const MARKETPLACE_ORDER: &str = r#"<html xmlns:x="urn:schemas-microsoft-com:office:excel">
<body>
<table>
  <tr><td colspan="7">订单号：SO240101</td></tr>
  <tr>
    <th>序号</th><th>商品编号</th><th>品牌</th><th>厂家型号</th><th>封装</th><th>商品名称</th><th>订购数量（修改后）</th>
  </tr>
  <tr>
    <td>1</td><td>C12345</td><td></td><td></td><td>0603</td><td></td><td>1,000</td>
  </tr>
  <tr>
    <td>2</td><td>C2040</td><td>Raspberry Pi</td><td>RP2040</td><td>QFN-56</td><td>32-bit MCU 3.3V</td><td>5</td>
  </tr>
  <tr>
    <td>3</td><td>C8678</td><td>LRC</td><td>LBSS138LT1G</td><td>SOT-23</td><td>N-Channel 50V 200mA MOSFET</td><td>10</td>
  </tr>
  <tr>
    <td>4</td><td>C8678</td><td>LRC</td><td>LBSS138LT1G</td><td>SOT-23</td><td>N-Channel 50V 200mA MOSFET</td><td>15</td>
  </tr>
  <tr><td>合计</td><td></td><td></td><td></td><td></td><td></td><td>1,055</td></tr>
</table>
</body>
</html>"#;

#[test]
fn test_native_export_round_trip() {
    let report = ImportEngine::new()
        .parse_bytes("inventory.csv", NATIVE_EXPORT.as_bytes(), None)
        .unwrap();

    assert_eq!(report.dialect, Dialect::NativeExport);
    assert_eq!(report.records.len(), 3);

    let capacitor = &report.records[0];
    assert_eq!(capacitor.id.as_deref(), Some("c-001"));
    assert_eq!(capacitor.location, "Drawer 3");
    assert_eq!(capacitor.min_stock_level, 20);
    let specs = capacitor.specifications.as_ref().unwrap();
    assert!(matches!(specs, Specifications::Capacitor(_)));
    assert_eq!(
        specs.attributes(),
        vec![("capacitance", "10nF"), ("tolerance", "±10%"), ("voltage", "50V")]
    );

    let resistor = &report.records[1];
    assert_eq!(
        resistor.specifications.as_ref().unwrap().attributes(),
        vec![("resistance", "10kΩ"), ("tolerance", "±5%"), ("power", "1/4W")]
    );

    let switch = &report.records[2];
    assert_eq!(switch.category, Category::Switches);
    assert_eq!(switch.min_stock_level, 10);
    assert_eq!(switch.specifications, None);
}

#[test]
fn test_marketplace_order() {
    let report = ImportEngine::new()
        .parse_bytes("SO240101.xls", MARKETPLACE_ORDER.as_bytes(), None)
        .unwrap();

    assert_eq!(report.dialect, Dialect::MarketplaceOrder);
    assert_eq!(report.header_row, 1);
    assert_eq!(report.data_rows, 5);
    assert_eq!(report.records_before_merge, 4);
    assert_eq!(report.records.len(), 3);

    let bulk = &report.records[0];
    assert_eq!(bulk.name, "C12345");
    assert_eq!(bulk.quantity, 1000);
    assert_eq!(bulk.min_stock_level, 200);
    assert_eq!(bulk.location, "");

    let mcu = &report.records[1];
    assert_eq!(mcu.description, "Raspberry Pi - RP2040 | QFN-56 | 32-bit MCU 3.3V");
    assert_eq!(mcu.category, Category::IntegratedCircuits);
    let specs = mcu.specifications.as_ref().unwrap();
    assert_eq!(specs.get("model"), Some("RP2040"));
    assert_eq!(specs.get("package"), Some("QFN-56"));
    assert_eq!(specs.get("voltage"), Some("3.3V"));

    let mosfet = &report.records[2];
    assert_eq!(mosfet.quantity, 25);
    assert_eq!(mosfet.min_stock_level, 5);
    assert_eq!(mosfet.category, Category::Transistors);
    assert_eq!(mosfet.specifications.as_ref().unwrap().get("type"), Some("N-Channel MOSFET"));
}

#[test]
fn test_marketplace_workbook() {
    let workbook = include_bytes!("fixtures/marketplace_order.xlsx");

    let report = ImportEngine::new()
        .parse(ImportSource::Binary(workbook))
        .unwrap();

    assert_eq!(report.dialect, Dialect::MarketplaceOrder);
    assert_eq!(report.header_row, 1);
    // the second sheet is a native export and must not be read
    assert_eq!(report.records.len(), 1);

    let capacitor = &report.records[0];
    assert_eq!(capacitor.name, "C1525");
    assert_eq!(capacitor.quantity, 1000);
    assert_eq!(capacitor.min_stock_level, 200);
    assert_eq!(capacitor.category, Category::Capacitors);
    assert_eq!(
        capacitor.specifications.as_ref().unwrap().attributes(),
        vec![
            ("package", "0402"),
            ("capacitance", "100nF"),
            ("tolerance", "±10%"),
            ("voltage", "16V"),
        ]
    );
}

#[test]
fn test_backup_file() {
    let backup = r#"{"components": [
        {"id": "r-1", "name": "RC0603 10k", "description": "10kΩ ±1%", "category": "Resistors",
         "quantity": 250, "location": "Drawer 1", "minStockLevel": 50,
         "specifications": {"resistance": "10kΩ", "tolerance": "±1%"}}
    ], "settings": {"language": "en"}}"#;

    let report = ImportEngine::new()
        .parse_bytes("partbin-backup.json", backup.as_bytes(), None)
        .unwrap();

    assert_eq!(report.dialect, Dialect::Backup);
    let record = &report.records[0];
    assert_eq!(record.location, "Drawer 1");
    assert_eq!(record.min_stock_level, 50);
    assert_eq!(record.specifications.as_ref().unwrap().get("resistance"), Some("10kΩ"));
}

#[test]
fn test_rows_without_table_element() {
    let markup = "<tr><td>Name</td><td>Quantity</td></tr>\n<tr><td>LED 3mm red</td><td>40</td></tr>";

    let report = ImportEngine::new()
        .parse(ImportSource::Html(markup))
        .unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].category, Category::Diodes);
}

#[test]
fn test_header_only_sheet_is_rejected() {
    let markup = "<table><tr><th>ID</th><th>Name</th><th>Quantity</th></tr><tr></tr></table>";

    let error = ImportEngine::new()
        .parse_bytes("empty.html", markup.as_bytes(), Some(ImportFormat::Html))
        .unwrap_err();

    assert_eq!(error.reason, "no valid records");
    assert_eq!(PartbinError::from(error).http_status_code(), 422);
}

#[test]
fn test_sheet_without_quantity_column_is_rejected() {
    let error = ImportEngine::new()
        .parse(ImportSource::Delimited("ID,Name,Category,Description\n1,R1,Resistors,10k\n"))
        .unwrap_err();

    assert_eq!(error.reason, "required fields missing");
}

#[test]
fn test_sheet_without_header_is_rejected() {
    let error = ImportEngine::new()
        .parse(ImportSource::Delimited("part,count\nR1,4\n"))
        .unwrap_err();

    assert_eq!(error.reason, "header row not found");
}

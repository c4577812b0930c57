use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pharmacy_cell::screens::{InventoryScreen, MedicationListScreen, PrescriptionListScreen};
use pharmacy_cell::services::pharmacy::PharmacyClient;
use shared_screens::{Screen, ScreenEvent};
use shared_utils::test_utils::{MockGatewayResponses, TestConfig};

fn client(server: &MockServer) -> PharmacyClient {
    let config = TestConfig::new(server.uri()).to_portal_config();
    PharmacyClient::new(&config, None)
}

#[tokio::test]
async fn test_entering_medications_loads_the_catalogue() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pharmacy/medications"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGatewayResponses::page(
            vec![MockGatewayResponses::medication_response(1, "Paracetamol")],
            1,
            0,
            10,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = MedicationListScreen::new(client(&server), 10);
    assert_eq!(screen.enter().await, ScreenEvent::None);

    let view = screen.render();
    assert!(view.contains("Paracetamol"));
    assert!(view.contains("$4.50"));
    assert!(view.contains("Page 1 of 1 (1 records)"));
}

#[tokio::test]
async fn test_search_replaces_the_table_with_a_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pharmacy/medications/search"))
        .and(query_param("query", "para"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockGatewayResponses::medication_response(1, "Paracetamol"),
            MockGatewayResponses::medication_response(2, "Paraffin gauze"),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pharmacy/medications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGatewayResponses::page(
            vec![MockGatewayResponses::medication_response(3, "Ibuprofen")],
            25,
            0,
            10,
        )))
        .mount(&server)
        .await;

    let mut screen = MedicationListScreen::new(client(&server), 10);
    screen.enter().await;
    assert!(screen.render().contains("Page 1 of 3 (25 records)"));

    assert_eq!(screen.handle("search para").await, ScreenEvent::None);
    let view = screen.render();
    assert!(view.contains("Paracetamol"));
    assert!(view.contains("Search: para"));
    assert!(view.contains("Page 1 of 1 (2 records)"));

    // Clearing the search goes back to the paged listing.
    assert_eq!(screen.handle("clear").await, ScreenEvent::None);
    assert!(screen.render().contains("Ibuprofen"));
}

#[tokio::test]
async fn test_declined_dispense_issues_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pharmacy/prescriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGatewayResponses::page(
            vec![MockGatewayResponses::prescription_response(3, 7, "PENDING")],
            1,
            0,
            10,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/pharmacy/prescriptions/3/dispense"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut screen = PrescriptionListScreen::new(client(&server), 10);
    screen.enter().await;

    screen.handle("dispense 3").await;
    assert!(screen.render().contains("Dispense prescription 3? (y/n)"));

    assert_eq!(screen.handle("n").await, ScreenEvent::None);
    assert!(!screen.render().contains("(y/n)"));
}

#[tokio::test]
async fn test_confirmed_dispense_refreshes_the_listing() {
    let server = MockServer::start().await;
    // Initial load plus the refresh after dispensing.
    Mock::given(method("GET"))
        .and(path("/pharmacy/prescriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGatewayResponses::page(
            vec![MockGatewayResponses::prescription_response(3, 7, "PENDING")],
            1,
            0,
            10,
        )))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/pharmacy/prescriptions/3/dispense"))
        .and(body_json(json!({})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockGatewayResponses::prescription_response(3, 7, "DISPENSED")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = PrescriptionListScreen::new(client(&server), 10);
    screen.enter().await;
    screen.handle("dispense 3").await;

    let event = screen.handle("y").await;
    assert_matches!(event, ScreenEvent::Notify(notice) => {
        assert!(notice.message.contains("dispensed"));
    });
}

#[tokio::test]
async fn test_already_dispensed_rows_refuse_the_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pharmacy/prescriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGatewayResponses::page(
            vec![MockGatewayResponses::prescription_response(3, 7, "DISPENSED")],
            1,
            0,
            10,
        )))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/pharmacy/prescriptions/3/dispense"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut screen = PrescriptionListScreen::new(client(&server), 10);
    screen.enter().await;

    let event = screen.handle("dispense 3").await;
    assert_matches!(event, ScreenEvent::Notify(notice) => {
        assert!(notice.message.contains("cannot be dispensed"));
    });
    assert!(!screen.render().contains("(y/n)"));
}

#[tokio::test]
async fn test_inventory_shows_alerts_and_stock_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pharmacy/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGatewayResponses::page(
            vec![
                MockGatewayResponses::inventory_response(1, "Paracetamol", 3, 10),
                MockGatewayResponses::inventory_response(2, "Insulin", 0, 5),
                MockGatewayResponses::inventory_response(3, "Bandages", 100, 10),
            ],
            3,
            0,
            10,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pharmacy/inventory/low-stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockGatewayResponses::inventory_response(1, "Paracetamol", 3, 10),
            MockGatewayResponses::inventory_response(2, "Insulin", 0, 5),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = InventoryScreen::new(client(&server), 10);
    assert_eq!(screen.enter().await, ScreenEvent::None);

    let view = screen.render();
    assert!(view.contains("Low stock: Paracetamol (3 left), Insulin (0 left)"));
    assert!(view.contains("Out of Stock"));
    assert!(view.contains("Low Stock"));
    assert!(view.contains("In Stock"));
}

#[tokio::test]
async fn test_adjust_refreshes_table_and_alerts() {
    let server = MockServer::start().await;
    // Once on entry, once after the adjustment.
    Mock::given(method("GET"))
        .and(path("/pharmacy/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGatewayResponses::page(
            vec![MockGatewayResponses::inventory_response(1, "Paracetamol", 3, 10)],
            1,
            0,
            10,
        )))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pharmacy/inventory/low-stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/pharmacy/inventory/1"))
        .and(body_json(json!({ "quantity": 50 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockGatewayResponses::inventory_response(1, "Paracetamol", 50, 10)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = InventoryScreen::new(client(&server), 10);
    screen.enter().await;

    let event = screen.handle("adjust 1 50").await;
    assert_matches!(event, ScreenEvent::Notify(notice) => {
        assert!(notice.message.contains("now at 50 units"));
    });
}

#[tokio::test]
async fn test_add_stock_registers_a_new_batch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pharmacy/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGatewayResponses::page(
            vec![MockGatewayResponses::inventory_response(1, "Paracetamol", 3, 10)],
            1,
            0,
            10,
        )))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pharmacy/inventory/low-stock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pharmacy/inventory/add-stock"))
        .and(body_json(json!({
            "medicationId": 1,
            "quantity": 40,
            "batchNumber": "BATCH-010",
            "expiryDate": "2027-01-01"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(MockGatewayResponses::inventory_response(10, "Paracetamol", 40, 20)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = InventoryScreen::new(client(&server), 10);
    screen.enter().await;

    let event = screen.handle("add 1 40 BATCH-010 2027-01-01").await;
    assert_matches!(event, ScreenEvent::Notify(notice) => {
        assert!(notice.message.contains("Added 40 units"));
    });
}

#[tokio::test]
async fn test_alert_strip_failure_degrades_quietly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pharmacy/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGatewayResponses::page(
            vec![MockGatewayResponses::inventory_response(3, "Bandages", 100, 10)],
            1,
            0,
            10,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pharmacy/inventory/low-stock"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "upstream unavailable"
        })))
        .mount(&server)
        .await;

    let mut screen = InventoryScreen::new(client(&server), 10);
    assert_eq!(screen.enter().await, ScreenEvent::None);

    // The table is intact; only the strip is missing.
    let view = screen.render();
    assert!(view.contains("Bandages"));
    assert!(!view.contains("Low stock:"));
}

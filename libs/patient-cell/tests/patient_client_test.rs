use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::models::{Gender, PatientRequest, PatientSearchCriteria};
use patient_cell::services::patient::PatientClient;
use shared_models::PageRequest;
use shared_utils::test_utils::{MockGatewayResponses, TestConfig, TestUser};

fn client(server: &MockServer) -> PatientClient {
    let config = TestConfig::new(server.uri()).to_portal_config();
    PatientClient::new(&config, None)
}

fn minimal_request() -> PatientRequest {
    PatientRequest {
        first_name: "John".to_string(),
        last_name: "Smith".to_string(),
        email: "john@example.com".to_string(),
        phone: "555-0199".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 30).unwrap(),
        gender: Gender::Male,
        address: None,
        emergency_contact: None,
        blood_type: None,
        allergies: None,
        medical_notes: None,
        insurance_info: None,
    }
}

#[tokio::test]
async fn test_list_requests_the_page_and_decodes_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients"))
        .and(query_param("page", "0"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGatewayResponses::page(
            vec![MockGatewayResponses::patient_response(1, "Alice", "Reed")],
            1,
            0,
            10,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server).list(PageRequest::first(10)).await.unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].full_name(), "Alice Reed");
    assert!(page.first && page.last);
}

#[tokio::test]
async fn test_requests_carry_the_session_token() {
    let server = MockServer::start().await;
    let token = TestUser::admin().token();

    Mock::given(method("GET"))
        .and(path("/patients/1"))
        .and(header("Authorization", format!("Bearer {}", token).as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockGatewayResponses::patient_response(1, "Alice", "Reed")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = TestConfig::new(server.uri()).to_portal_config();
    let client = PatientClient::new(&config, Some(token));
    let patient = client.get(1).await.unwrap();
    assert_eq!(patient.id, 1);
}

#[tokio::test]
async fn test_missing_patient_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Patient not found with id: 99"
        })))
        .mount(&server)
        .await;

    let err = client(&server).get(99).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_create_posts_the_camel_case_body() {
    let server = MockServer::start().await;
    let request = minimal_request();

    Mock::given(method("POST"))
        .and(path("/patients"))
        .and(body_json(&request))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(MockGatewayResponses::patient_response(10, "John", "Smith")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server).create(&request).await.unwrap();
    assert_eq!(created.id, 10);
}

#[tokio::test]
async fn test_update_puts_to_the_entity_path() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/patients/5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockGatewayResponses::patient_response(5, "John", "Smith")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let updated = client(&server).update(5, &minimal_request()).await.unwrap();
    assert_eq!(updated.id, 5);
}

#[tokio::test]
async fn test_delete_tolerates_an_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/patients/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete(5).await.unwrap();
}

#[tokio::test]
async fn test_search_sends_criteria_beside_the_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients/search"))
        .and(query_param("firstName", "ali"))
        .and(query_param("page", "0"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockGatewayResponses::page(
            vec![MockGatewayResponses::patient_response(1, "Alice", "Reed")],
            1,
            0,
            10,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let criteria = PatientSearchCriteria::by_name("ali");
    let page = client(&server)
        .search(&criteria, PageRequest::first(10))
        .await
        .unwrap();
    assert_eq!(page.content.len(), 1);
}

#[tokio::test]
async fn test_medical_history_returns_raw_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patients/1/medical-history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"date": "2024-03-01", "diagnosis": "Seasonal flu"},
            {"date": "2024-06-10", "diagnosis": "Sprained ankle"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let entries = client(&server).medical_history(1).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["diagnosis"], "Seasonal flu");
}

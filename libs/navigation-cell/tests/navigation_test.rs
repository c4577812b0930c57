use navigation_cell::{Navigator, Resolution, Route, RouteAccess, RouteTable, RouteTarget, ScreenId};
use session_cell::context::SessionContext;
use session_cell::models::Session;
use shared_models::PortalError;
use shared_utils::test_utils::TestUser;

fn logged_in(user: TestUser) -> SessionContext {
    let mut ctx = SessionContext::new();
    ctx.establish(Session::from_token(user.token()).unwrap());
    ctx
}

fn resolve(path: &str, session: &SessionContext) -> Resolution {
    Navigator::portal().resolve(path, session).unwrap()
}

#[test]
fn test_root_redirects_to_dashboard() {
    let session = logged_in(TestUser::admin());
    let resolution = resolve("/", &session);
    assert_eq!(resolution.screen, ScreenId::Dashboard);
    assert_eq!(resolution.path, "/dashboard");
}

#[test]
fn test_unauthenticated_deep_link_lands_on_login_with_return_url() {
    let session = SessionContext::new();
    let resolution = resolve("/patients/42", &session);

    assert_eq!(resolution.screen, ScreenId::Login);
    assert_eq!(resolution.return_url(), Some("/patients/42"));
}

#[test]
fn test_return_url_keeps_the_query_string() {
    let session = SessionContext::new();
    let resolution = resolve("/appointments?status=PENDING", &session);

    assert_eq!(resolution.screen, ScreenId::Login);
    assert_eq!(resolution.return_url(), Some("/appointments?status=PENDING"));
}

#[test]
fn test_doctor_is_turned_away_from_billing() {
    let session = logged_in(TestUser::doctor());
    let resolution = resolve("/billing", &session);
    assert_eq!(resolution.screen, ScreenId::Unauthorized);
}

#[test]
fn test_receptionist_reaches_billing() {
    let session = logged_in(TestUser::receptionist());
    let resolution = resolve("/billing", &session);
    assert_eq!(resolution.screen, ScreenId::InvoiceList);
}

#[test]
fn test_admin_reaches_every_gated_area() {
    let session = logged_in(TestUser::admin());
    assert_eq!(resolve("/billing", &session).screen, ScreenId::InvoiceList);
    assert_eq!(
        resolve("/pharmacy/inventory", &session).screen,
        ScreenId::Inventory
    );
}

#[test]
fn test_receptionist_cannot_open_pharmacy() {
    let session = logged_in(TestUser::receptionist());
    let resolution = resolve("/pharmacy/medications", &session);
    assert_eq!(resolution.screen, ScreenId::Unauthorized);
}

#[test]
fn test_pharmacy_root_redirects_to_medications() {
    let session = logged_in(TestUser::pharmacist());
    let resolution = resolve("/pharmacy", &session);
    assert_eq!(resolution.screen, ScreenId::MedicationList);
    assert_eq!(resolution.path, "/pharmacy/medications");
}

#[test]
fn test_unknown_path_falls_back_to_dashboard() {
    let session = logged_in(TestUser::nurse());
    let resolution = resolve("/no/such/screen", &session);
    assert_eq!(resolution.screen, ScreenId::Dashboard);
}

#[test]
fn test_unknown_path_while_logged_out_still_requires_login() {
    let session = SessionContext::new();
    let resolution = resolve("/no/such/screen", &session);

    // The fallback target is guarded, so the return URL names it.
    assert_eq!(resolution.screen, ScreenId::Login);
    assert_eq!(resolution.return_url(), Some("/dashboard"));
}

#[test]
fn test_detail_route_exposes_numeric_id() {
    let session = logged_in(TestUser::admin());
    let resolution = resolve("/patients/42", &session);
    assert_eq!(resolution.screen, ScreenId::PatientDetail);
    assert_eq!(resolution.id_param(), Some(42));

    let resolution = resolve("/appointments/7/edit", &session);
    assert_eq!(resolution.screen, ScreenId::AppointmentForm);
    assert_eq!(resolution.id_param(), Some(7));
}

#[test]
fn test_expired_session_resolves_like_a_logged_out_one() {
    let mut session = SessionContext::new();
    session.establish(Session::from_token(TestUser::admin().expired_token()).unwrap());

    let resolution = resolve("/billing", &session);
    assert_eq!(resolution.screen, ScreenId::Login);
    assert_eq!(resolution.return_url(), Some("/billing"));
}

#[test]
fn test_resolution_is_stable_across_repeated_calls() {
    let navigator = Navigator::portal();
    let session = logged_in(TestUser::doctor());

    let first = navigator.resolve("/billing", &session).unwrap();
    let second = navigator.resolve("/billing", &session).unwrap();
    assert_eq!(first.screen, second.screen);
    assert_eq!(first.path, second.path);
}

#[test]
fn test_circular_redirects_are_cut_off() {
    let table = RouteTable::new(
        vec![
            Route::new("/a", RouteTarget::Redirect("/b"), RouteAccess::Public),
            Route::new("/b", RouteTarget::Redirect("/a"), RouteAccess::Public),
        ],
        "/a",
    );
    let navigator = Navigator::new(table);

    let err = navigator.resolve("/a", &SessionContext::new()).unwrap_err();
    assert!(matches!(err, PortalError::Config(_)));
}

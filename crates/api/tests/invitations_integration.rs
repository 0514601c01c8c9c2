//! Integration tests for the invitation list and create pages.

mod common;

use axum::http::StatusCode;
use common::{
    body_text, create_test_app, escaped, get, list_item, location, post_form, sample_template,
    send, status_error, MockBackend, ADMIN_COOKIE,
};
use domain::models::{InvitationStatus, RsvpStatus, ScheduleEntry};
use uuid::Uuid;

fn invitation_fields<'a>(extra: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    let mut fields = vec![
        ("template_id", ""),
        ("recipient_salutation", "Bà"),
        ("recipient_name", "Trần Thị B"),
        ("recipient_title", "Kế toán trưởng"),
        ("title", "Year End Party"),
        ("company_name", "GTE"),
        ("content", "Welcome"),
        ("event_time", "2025-12-20T19:00"),
        ("event_location", "Hà Nội"),
        ("google_map_url", ""),
    ];
    fields.extend_from_slice(extra);
    fields
}

#[tokio::test]
async fn test_list_shows_stats_and_rows() {
    let backend = MockBackend::new();
    let mut unsent = list_item("Gala", RsvpStatus::Pending, None);
    unsent.invitation.slug = None;
    backend.state().invitations = vec![
        list_item("Year End", RsvpStatus::Attending, Some(2)),
        list_item("Kick Off", RsvpStatus::Declined, Some(1)),
        unsent,
    ];
    let app = create_test_app(backend);

    let response = send(&app, get("/admin/invitations", Some(ADMIN_COOKIE))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Tổng: 3 | ATTENDING: 1 | DECLINED: 1 | PENDING: 1"));
    assert!(body.contains("Year End"));
    assert!(body.contains("Kick Off"));
    assert!(body.contains("Gala"));
    assert!(body.contains(&escaped("/invite/year-end")));
    assert!(body.contains(&escaped("Xóa thiệp mời \"Kick Off\"?")));
}

#[tokio::test]
async fn test_list_filters_by_rsvp() {
    let backend = MockBackend::new();
    backend.state().invitations = vec![
        list_item("Year End", RsvpStatus::Attending, Some(2)),
        list_item("Kick Off", RsvpStatus::Declined, Some(1)),
    ];
    let app = create_test_app(backend);

    let body = body_text(
        send(
            &app,
            get("/admin/invitations?rsvp=DECLINED", Some(ADMIN_COOKIE)),
        )
        .await,
    )
    .await;

    // Stats always cover the full list
    assert!(body.contains("Tổng: 2"));
    assert!(body.contains("Kick Off"));
    assert!(!body.contains("Year End</td>"));
    assert!(body.contains(r#"<option value="DECLINED" selected>"#));
}

#[tokio::test]
async fn test_list_unknown_filter_shows_all() {
    let backend = MockBackend::new();
    backend.state().invitations = vec![
        list_item("Year End", RsvpStatus::Attending, None),
        list_item("Kick Off", RsvpStatus::Declined, None),
    ];
    let app = create_test_app(backend);

    let body = body_text(
        send(&app, get("/admin/invitations?rsvp=bogus", Some(ADMIN_COOKIE))).await,
    )
    .await;

    assert!(body.contains("Year End</td>"));
    assert!(body.contains("Kick Off</td>"));
}

#[tokio::test]
async fn test_list_failure_shows_empty_table() {
    let backend = MockBackend::new();
    backend.state().invitations = vec![list_item("Year End", RsvpStatus::Attending, None)];
    backend.state().failure = Some(status_error(500, None));
    let app = create_test_app(backend);

    let response = send(&app, get("/admin/invitations", Some(ADMIN_COOKIE))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Tổng: 0"));
    assert!(!body.contains("Year End</td>"));
}

#[tokio::test]
async fn test_delete_invitation_redirects() {
    let backend = MockBackend::new();
    let app = create_test_app(backend.clone());
    let id = Uuid::new_v4();

    let response = send(
        &app,
        post_form(
            &format!("/admin/invitations/{}/delete", id),
            &[],
            Some(ADMIN_COOKIE),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/invitations"));
    assert_eq!(backend.state().deleted_invitations, vec![id]);
}

#[tokio::test]
async fn test_delete_failure_still_redirects() {
    let backend = MockBackend::new();
    backend.state().failure = Some(status_error(500, None));
    let app = create_test_app(backend);

    let response = send(
        &app,
        post_form(
            &format!("/admin/invitations/{}/delete", Uuid::new_v4()),
            &[],
            Some(ADMIN_COOKIE),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/invitations"));
}

#[tokio::test]
async fn test_create_page_selects_first_template() {
    let backend = MockBackend::new();
    let first = sample_template("Gala");
    let first_id = first.id;
    backend.state().templates = vec![first, sample_template("Year End")];
    let app = create_test_app(backend);

    let response = send(&app, get("/admin/invitations/create", Some(ADMIN_COOKIE))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(&format!(r#"<option value="{}" selected>Gala</option>"#, first_id)));
    assert!(body.contains(r#"<option value="Ông" selected>"#));
}

#[tokio::test]
async fn test_create_page_without_templates() {
    let app = create_test_app(MockBackend::new());

    let body = body_text(
        send(&app, get("/admin/invitations/create", Some(ADMIN_COOKIE))).await,
    )
    .await;

    assert!(body.contains("Chưa có mẫu"));
}

#[tokio::test]
async fn test_apply_template_copies_event_details() {
    let backend = MockBackend::new();
    let template = sample_template("Gala");
    let id = template.id.to_string();
    backend.state().templates = vec![template];
    let app = create_test_app(backend.clone());

    let response = send(
        &app,
        post_form(
            "/admin/invitations/create",
            &[
                ("template_id", id.as_str()),
                ("recipient_salutation", "Bà"),
                ("recipient_name", "Trần Thị B"),
                ("recipient_title", "Kế toán trưởng"),
                ("title", ""),
                ("event_time", ""),
                ("op", "apply_template"),
            ],
            Some(ADMIN_COOKIE),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Gala title"));
    assert!(body.contains("2025-12-20T19:00"));
    assert!(body.contains(r#"value="Đón khách""#));
    // Recipient fields are untouched
    assert!(body.contains(r#"value="Trần Thị B""#));
    assert!(body.contains(r#"<option value="Bà" selected>"#));
    assert!(backend.state().created_invitations.is_empty());
}

#[tokio::test]
async fn test_save_draft_sends_draft_status() {
    let backend = MockBackend::new();
    let app = create_test_app(backend.clone());

    let response = send(
        &app,
        post_form(
            "/admin/invitations/create",
            &invitation_fields(&[
                ("schedule_time", "18:00"),
                ("schedule_label", "Đón khách"),
                ("op", "save_draft"),
            ]),
            Some(ADMIN_COOKIE),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/invitations"));

    let state = backend.state();
    let payload = &state.created_invitations[0];
    assert_eq!(payload.status, InvitationStatus::Draft);
    assert_eq!(payload.recipient_salutation.as_deref(), Some("Bà"));
    assert_eq!(payload.recipient_name, "Trần Thị B");
    assert_eq!(payload.event_time, "2025-12-20T19:00");
    assert_eq!(payload.google_map_url, None);
    assert_eq!(
        payload.schedule,
        Some(vec![ScheduleEntry::new("18:00", "Đón khách")])
    );
}

#[tokio::test]
async fn test_publish_sends_published_status() {
    let backend = MockBackend::new();
    let app = create_test_app(backend.clone());

    send(
        &app,
        post_form(
            "/admin/invitations/create",
            &invitation_fields(&[("op", "publish")]),
            Some(ADMIN_COOKIE),
        ),
    )
    .await;

    let state = backend.state();
    assert_eq!(state.created_invitations[0].status, InvitationStatus::Published);
    assert_eq!(state.created_invitations[0].schedule, None);
}

#[tokio::test]
async fn test_create_requires_recipient() {
    let backend = MockBackend::new();
    let app = create_test_app(backend.clone());

    let mut fields = invitation_fields(&[("op", "publish")]);
    fields.retain(|(name, _)| *name != "recipient_name" && *name != "recipient_title");

    let body = body_text(
        send(
            &app,
            post_form("/admin/invitations/create", &fields, Some(ADMIN_COOKIE)),
        )
        .await,
    )
    .await;

    assert!(body.contains("Thiếu thông tin bắt buộc: recipient_name, recipient_title"));
    assert!(backend.state().created_invitations.is_empty());
}

#[tokio::test]
async fn test_create_failure_message() {
    let backend = MockBackend::new();
    backend.state().failure = Some(status_error(400, Some("slug collision")));
    let app = create_test_app(backend);

    let body = body_text(
        send(
            &app,
            post_form(
                "/admin/invitations/create",
                &invitation_fields(&[("op", "publish")]),
                Some(ADMIN_COOKIE),
            ),
        )
        .await,
    )
    .await;

    assert!(body.contains("Lỗi lưu thiệp"));
    assert!(!body.contains("slug collision"));
    assert!(body.contains(r#"value="Trần Thị B""#));
}

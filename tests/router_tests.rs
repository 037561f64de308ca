//! Route table matching against the application's real routes.

use contactd::registry;
use contactd::router::Router;
use http::Method;

#[test]
fn the_route_table_matches_as_expected() {
    let router = Router::new(registry::routes());

    let cases = vec![
        (Method::GET, "/", Some("list_contacts")),
        (Method::GET, "/contacts", Some("list_contacts")),
        (Method::GET, "/contacts/new", Some("new_contact_form")),
        (Method::POST, "/contacts", Some("create_contact")),
        (Method::GET, "/contacts/7", Some("show_contact")),
        (Method::GET, "/contacts/7/edit", Some("edit_contact_form")),
        (Method::POST, "/contacts/7", None),
        (Method::GET, "/contacts/7/delete", None),
        (Method::DELETE, "/contacts/7", None),
        (Method::GET, "/nope", None),
    ];

    for (method, path, expected) in cases {
        let result = router.route(&method, path);
        match (result, expected) {
            (Some(m), Some(handler)) => assert_eq!(
                m.handler_name, handler,
                "{method} {path} matched the wrong handler"
            ),
            (None, None) => {}
            (got, want) => panic!("{method} {path}: got {got:?}, expected {want:?}"),
        }
    }
}

#[test]
fn literal_new_wins_over_the_id_parameter() {
    let router = Router::new(registry::routes());
    let m = router.route(&Method::GET, "/contacts/new").unwrap();
    assert_eq!(m.handler_name, "new_contact_form");
    assert!(m.get_path_param("id").is_none());
}

#[test]
fn id_parameter_is_captured() {
    let router = Router::new(registry::routes());
    let m = router.route(&Method::GET, "/contacts/42").unwrap();
    assert_eq!(m.handler_name, "show_contact");
    assert_eq!(m.get_path_param("id"), Some("42"));

    let m = router.route(&Method::GET, "/contacts/42/edit").unwrap();
    assert_eq!(m.handler_name, "edit_contact_form");
    assert_eq!(m.get_path_param("id"), Some("42"));
}

#[test]
fn patterns_are_anchored() {
    let router = Router::new(registry::routes());
    assert!(router.route(&Method::GET, "/contacts/42/edit/extra").is_none());
    assert!(router.route(&Method::GET, "/prefix/contacts").is_none());
}

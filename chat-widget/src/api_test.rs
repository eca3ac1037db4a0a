use super::*;

// =============================================================
// Endpoints
// =============================================================

#[test]
fn endpoints_join_base_and_paths() {
    let e = Endpoints::new("https://api.example.com/");
    assert_eq!(e.widget("w1"), "https://api.example.com/api/widgets/w1");
    assert_eq!(e.status("w1"), "https://api.example.com/api/widgets/w1/status");
    assert_eq!(e.chat("w1"), "https://api.example.com/api/widgets/w1/chat");
}

#[test]
fn endpoints_are_relative_without_base() {
    let e = Endpoints::new("");
    assert_eq!(e.status("w2"), "/api/widgets/w2/status");
}

#[test]
fn endpoints_encode_the_id_segment() {
    let e = Endpoints::new("");
    assert_eq!(e.widget("a/b c"), "/api/widgets/a%2Fb%20c");
}

#[test]
fn http_api_takes_base_from_settings() {
    let settings = EmbedSettings {
        api_base: "http://localhost:8080".into(),
        ..EmbedSettings::default()
    };
    let api = HttpApi::new(&settings);
    assert_eq!(api.endpoints().chat("w1"), "http://localhost:8080/api/widgets/w1/chat");
}

use chrono::{Duration, TimeZone, Utc};
use ytcards_core::card::{CardRenderer, data_uri};
use ytcards_core::locale::LocaleTable;
use ytcards_core::params::{QueryParams, RenderParameters};

fn render(query: &str, views: &str) -> String {
    let table = LocaleTable::embedded().expect("locales");
    let params = RenderParameters::from_query(&QueryParams::parse(query)).expect("params");
    let renderer = CardRenderer::new().expect("renderer");
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    renderer
        .render_video(
            &params,
            table.resolve(&params.lang),
            views,
            data_uri(b"thumb", "image/jpeg"),
            now,
        )
        .expect("render")
}

#[test]
fn card_uses_requested_geometry_and_colors() {
    let svg = render(
        "id=dQw4w9WgXcQ&title=Hello&width=300&border_radius=8&background_color=%23123456",
        "",
    );
    assert!(svg.contains("width=\"300\""));
    assert!(svg.contains("rx=\"8\""));
    assert!(svg.contains("fill=\"#123456\""));
    assert!(svg.contains("fill=\"#ffffff\""));
    assert!(svg.contains("direction=\"ltr\""));
    assert!(svg.contains("data:image/jpeg;base64,dGh1bWI="));
}

#[test]
fn stats_join_views_and_relative_time() {
    let published = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() - Duration::days(2);
    let svg = render(
        &format!("id=dQw4w9WgXcQ&title=Hello&timestamp={}", published.timestamp()),
        "1.2M",
    );
    assert!(svg.contains("1.2M views\u{2002}•\u{2002}2 days ago"));
}

#[test]
fn stats_without_views_show_only_time() {
    let published = Utc.with_ymd_and_hms(2023, 12, 31, 21, 0, 0).unwrap();
    let svg = render(
        &format!("id=dQw4w9WgXcQ&timestamp={}", published.timestamp()),
        "",
    );
    assert!(svg.contains(">3 hours ago<"));
    assert!(!svg.contains('\u{2002}'));
}

#[test]
fn rtl_locale_mirrors_text() {
    let svg = render("id=dQw4w9WgXcQ&title=Hello&lang=he", "1.5K");
    assert!(svg.contains("direction=\"rtl\""));
    assert!(svg.contains("translate(240, 195)"));
    assert!(svg.contains("\u{200f} צפיות"));
}

#[test]
fn title_lines_respect_maximum() {
    let svg = render(
        "id=dQw4w9WgXcQ&title=Rick+Astley+-+Never+Gonna+Give+You+Up+(Official+Music+Video)&max_title_lines=2",
        "",
    );
    assert_eq!(svg.matches("<tspan x=\"0\" dy=\"20px\">").count(), 2);
    assert!(svg.contains("height=\"240\""));
}

#[test]
fn duration_badge_only_when_given() {
    let with = render("id=dQw4w9WgXcQ&duration=211", "");
    assert!(with.contains(">3:31<"));
    let without = render("id=dQw4w9WgXcQ", "");
    assert!(!without.contains("class=\"duration\" x="));
}

#[test]
fn title_text_is_escaped() {
    let svg = render("id=dQw4w9WgXcQ&title=%3Cb%3E+%26+co", "");
    assert!(svg.contains("&lt;b&gt; &amp; co"));
    assert!(!svg.contains("<b>"));
}

#[test]
fn index_page_renders() {
    let renderer = CardRenderer::new().expect("renderer");
    let html = renderer
        .render_index(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        .expect("index");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("&copy; 2024"));
}

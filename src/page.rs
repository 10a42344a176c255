use serde::Deserialize;

pub const PROJECTS_ENDPOINT: &str = "http://127.0.0.1:5000/projects";
pub const CONTACT_ENDPOINT: &str = "http://127.0.0.1:5000/contact";

pub const PROJECT_CARD_CLASS: &str = "portfolio-card glass-card hover-lift fade-in-up";
pub const PROJECT_IMAGE_PLACEHOLDER: &str =
    "https://via.placeholder.com/355x200?text=Project+Image";
pub const CARD_STAGGER_MS: u32 = 100;
pub const PROGRESS_STAGGER_MS: u32 = 200;

pub const ENTRANCE_THRESHOLD: f64 = 0.1;
pub const ENTRANCE_ROOT_MARGIN: &str = "0px 0px -100px 0px";

pub const SCROLL_THROTTLE_WINDOW_MS: f64 = 16.0;

pub const NOTIFICATION_SLIDE_IN_DELAY_MS: u32 = 100;
pub const NOTIFICATION_SLIDE_OUT_MS: u32 = 300;
pub const NOTIFICATION_TTL_MS: u32 = 5_000;
pub const NOTIFICATION_OFFSCREEN_TRANSFORM: &str = "translateX(400px)";
pub const NOTIFICATION_ONSCREEN_TRANSFORM: &str = "translateX(0)";
pub const NOTIFICATION_BASE_STYLE: &str = concat!(
    "position: fixed; top: 20px; right: 20px; ",
    "background: rgba(255, 255, 255, 0.1); backdrop-filter: blur(20px); ",
    "border: 1px solid rgba(255, 255, 255, 0.2); border-radius: 15px; ",
    "padding: 1rem 1.5rem; color: white; z-index: 10000; ",
    "transform: translateX(400px); transition: transform 0.3s ease; max-width: 300px;"
);

pub const SENDING_LABEL: &str = "Sending...";
pub const CONTACT_FALLBACK_SUCCESS: &str = "Message sent!";
pub const CONTACT_FALLBACK_ERROR: &str = "Something went wrong!";
pub const CONTACT_NETWORK_ERROR: &str = "Network error. Please try again later.";

pub const TYPING_ANIMATION: &str =
    "typing 3.5s steps(30, end), blink-caret 0.75s step-end infinite";
pub const TYPING_RESTART_TICK_MS: u32 = 10;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub details_link: Option<String>,
    #[serde(default)]
    pub live_demo_link: Option<String>,
    #[serde(default)]
    pub github_link: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardSpec {
    pub class_name: &'static str,
    pub delay_ms: u32,
    pub html: String,
}

pub fn project_cards(projects: &[Project]) -> Vec<CardSpec> {
    projects
        .iter()
        .enumerate()
        .map(|(index, project)| CardSpec {
            class_name: PROJECT_CARD_CLASS,
            delay_ms: card_delay_ms(index),
            html: project_card_html(project),
        })
        .collect()
}

pub fn card_delay_ms(index: usize) -> u32 {
    index as u32 * CARD_STAGGER_MS
}

pub fn progress_delay_ms(index: usize) -> u32 {
    index as u32 * PROGRESS_STAGGER_MS
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

pub fn project_card_html(project: &Project) -> String {
    let image_url = non_empty(&project.image_url).unwrap_or(PROJECT_IMAGE_PLACEHOLDER);
    let details_link = non_empty(&project.details_link).unwrap_or("#");
    let title = escape_html(&project.title);

    let mut links = String::new();
    if let Some(live_demo) = non_empty(&project.live_demo_link) {
        links.push_str(&format!(
            r#"<a href="{}" target="_blank" class="btn-small">Live Demo</a>"#,
            escape_html(live_demo)
        ));
    }
    if let Some(github) = non_empty(&project.github_link) {
        links.push_str(&format!(
            r#"<a href="{}" target="_blank" class="btn-small">GitHub</a>"#,
            escape_html(github)
        ));
    }

    format!(
        concat!(
            r#"<div class="portfolio-image">"#,
            r#"<a href="{details}"><img src="{image}" alt="{title}" width="355" height="auto"></a>"#,
            r#"</div>"#,
            r#"<div class="portfolio-content">"#,
            r#"<h3>{title}</h3>"#,
            r#"<p>{description}</p>"#,
            r#"<div class="portfolio-links">{links}</div>"#,
            r#"</div>"#
        ),
        details = escape_html(details_link),
        image = escape_html(image_url),
        title = title,
        description = escape_html(&project.description),
        links = links,
    )
}

// interpolated backend fields land in both text and attribute positions
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn parse_delay_attr(value: Option<&str>) -> u32 {
    value
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollStyles {
    pub parallax_transform: String,
    pub navbar_background: String,
}

pub fn scroll_styles(scroll_y: f64) -> ScrollStyles {
    ScrollStyles {
        parallax_transform: parallax_transform(scroll_y),
        navbar_background: navbar_background(scroll_y),
    }
}

pub fn parallax_transform(scroll_y: f64) -> String {
    format!(
        "translateY({:.2}px) rotate({:.2}deg)",
        scroll_y * 0.5,
        scroll_y * 0.01
    )
}

pub fn navbar_background(scroll_y: f64) -> String {
    let progress = (scroll_y / 100.0).min(1.0);
    format!("rgba(255, 255, 255, {:.3})", 0.1 + progress * 0.1)
}

pub struct ThrottleWindow {
    window_ms: f64,
    open_at: f64,
}

impl ThrottleWindow {
    pub fn new(window_ms: f64) -> Self {
        Self {
            window_ms,
            open_at: f64::NEG_INFINITY,
        }
    }

    // leading edge only: a blocked call is dropped, never queued
    pub fn try_pass(&mut self, now_ms: f64) -> bool {
        if now_ms < self.open_at {
            return false;
        }
        self.open_at = now_ms + self.window_ms;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeroTransition {
    ScrolledPast,
    Returned,
}

#[derive(Default)]
pub struct HeroTracker {
    scrolled_past: bool,
}

impl HeroTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, rect_top: f64, rect_bottom: f64) -> Option<HeroTransition> {
        if rect_bottom < 0.0 && !self.scrolled_past {
            self.scrolled_past = true;
            Some(HeroTransition::ScrolledPast)
        } else if rect_top >= 0.0 && self.scrolled_past {
            self.scrolled_past = false;
            Some(HeroTransition::Returned)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ContactReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

pub fn reply_notification(accepted: bool, reply: &ContactReply) -> (NotificationKind, String) {
    if accepted {
        (
            NotificationKind::Success,
            reply
                .message
                .clone()
                .unwrap_or_else(|| CONTACT_FALLBACK_SUCCESS.to_string()),
        )
    } else {
        (
            NotificationKind::Error,
            reply
                .error
                .clone()
                .unwrap_or_else(|| CONTACT_FALLBACK_ERROR.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str) -> Project {
        Project {
            title: title.to_string(),
            description: "A project.".to_string(),
            image_url: None,
            details_link: None,
            live_demo_link: None,
            github_link: None,
        }
    }

    #[test]
    fn card_specs_follow_array_order_with_staggered_delays() {
        let projects = vec![project("One"), project("Two"), project("Three")];
        let cards = project_cards(&projects);

        assert_eq!(cards.len(), 3);
        for (index, card) in cards.iter().enumerate() {
            assert_eq!(card.class_name, PROJECT_CARD_CLASS);
            assert_eq!(card.delay_ms, index as u32 * 100);
        }
        assert!(cards[1].html.contains("<h3>Two</h3>"));
    }

    #[test]
    fn missing_image_renders_placeholder() {
        let html = project_card_html(&project("One"));
        assert!(html.contains(PROJECT_IMAGE_PLACEHOLDER));

        let mut with_image = project("Two");
        with_image.image_url = Some("https://example.com/two.png".to_string());
        let html = project_card_html(&with_image);
        assert!(html.contains("https://example.com/two.png"));
        assert!(!html.contains(PROJECT_IMAGE_PLACEHOLDER));
    }

    #[test]
    fn empty_image_url_falls_back_to_placeholder() {
        let mut blank = project("One");
        blank.image_url = Some(String::new());
        assert!(project_card_html(&blank).contains(PROJECT_IMAGE_PLACEHOLDER));
    }

    #[test]
    fn absent_links_are_omitted_entirely() {
        let html = project_card_html(&project("One"));
        assert!(!html.contains("Live Demo"));
        assert!(!html.contains("GitHub"));

        let mut with_demo = project("Two");
        with_demo.live_demo_link = Some("https://example.com/demo".to_string());
        let html = project_card_html(&with_demo);
        assert!(html.contains("Live Demo"));
        assert!(!html.contains("GitHub"));

        let mut empty_github = project("Three");
        empty_github.github_link = Some(String::new());
        assert!(!project_card_html(&empty_github).contains("GitHub"));
    }

    #[test]
    fn missing_details_link_anchors_to_fragment() {
        let html = project_card_html(&project("One"));
        assert!(html.contains(r##"<a href="#">"##));
    }

    #[test]
    fn interpolated_fields_are_escaped() {
        let mut hostile = project("<script>alert(1)</script>");
        hostile.description = r#"a "quoted" & <b>bold</b> description"#.to_string();
        hostile.live_demo_link = Some(r#"https://example.com/?a=1&b="x""#.to_string());

        let html = project_card_html(&hostile);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("a &quot;quoted&quot; &amp; &lt;b&gt;bold&lt;/b&gt; description"));
        assert!(html.contains("https://example.com/?a=1&amp;b=&quot;x&quot;"));
    }

    #[test]
    fn project_deserializes_with_optional_and_unknown_fields() {
        let raw = r#"{
            "id": 7,
            "title": "StoryVerse",
            "description": "An epic adventure.",
            "github_link": "https://example.com/story"
        }"#;
        let parsed: Project = serde_json::from_str(raw).expect("project should deserialize");
        assert_eq!(parsed.title, "StoryVerse");
        assert_eq!(parsed.image_url, None);
        assert_eq!(parsed.github_link.as_deref(), Some("https://example.com/story"));
    }

    #[test]
    fn delay_attr_parsing_defaults_to_zero() {
        assert_eq!(parse_delay_attr(None), 0);
        assert_eq!(parse_delay_attr(Some("")), 0);
        assert_eq!(parse_delay_attr(Some("not-a-number")), 0);
        assert_eq!(parse_delay_attr(Some("200")), 200);
        assert_eq!(parse_delay_attr(Some(" 300 ")), 300);
    }

    #[test]
    fn progress_delays_are_staggered_by_position() {
        assert_eq!(progress_delay_ms(0), 0);
        assert_eq!(progress_delay_ms(1), 200);
        assert_eq!(progress_delay_ms(4), 800);
    }

    #[test]
    fn parallax_transform_tracks_scroll_offset() {
        assert_eq!(parallax_transform(0.0), "translateY(0.00px) rotate(0.00deg)");
        assert_eq!(
            parallax_transform(200.0),
            "translateY(100.00px) rotate(2.00deg)"
        );
    }

    #[test]
    fn navbar_background_clamps_past_100px() {
        assert_eq!(navbar_background(0.0), "rgba(255, 255, 255, 0.100)");
        assert_eq!(navbar_background(50.0), "rgba(255, 255, 255, 0.150)");
        assert_eq!(navbar_background(100.0), "rgba(255, 255, 255, 0.200)");
        assert_eq!(navbar_background(1000.0), "rgba(255, 255, 255, 0.200)");
    }

    #[test]
    fn throttle_passes_once_per_window() {
        let mut gate = ThrottleWindow::new(16.0);
        assert!(gate.try_pass(0.0));
        assert!(!gate.try_pass(1.0));
        assert!(!gate.try_pass(15.9));
        assert!(gate.try_pass(16.0));
        assert!(!gate.try_pass(17.0));
    }

    #[test]
    fn hero_tracker_reports_each_transition_once() {
        let mut tracker = HeroTracker::new();

        // hero fully visible: nothing to report
        assert_eq!(tracker.update(10.0, 600.0), None);

        // hero leaves through the top of the viewport
        assert_eq!(tracker.update(-700.0, -10.0), Some(HeroTransition::ScrolledPast));
        assert_eq!(tracker.update(-800.0, -110.0), None);

        // hero comes back
        assert_eq!(tracker.update(5.0, 600.0), Some(HeroTransition::Returned));
        assert_eq!(tracker.update(10.0, 600.0), None);
    }

    #[test]
    fn accepted_reply_uses_server_message() {
        let reply = ContactReply {
            message: Some("OK".to_string()),
            error: None,
        };
        assert_eq!(
            reply_notification(true, &reply),
            (NotificationKind::Success, "OK".to_string())
        );
    }

    #[test]
    fn rejected_reply_uses_server_error_or_fallback() {
        let reply = ContactReply {
            message: None,
            error: Some("Invalid email".to_string()),
        };
        assert_eq!(
            reply_notification(false, &reply),
            (NotificationKind::Error, "Invalid email".to_string())
        );

        assert_eq!(
            reply_notification(false, &ContactReply::default()),
            (NotificationKind::Error, CONTACT_FALLBACK_ERROR.to_string())
        );
    }
}

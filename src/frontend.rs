use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use js_sys::{Array, Date};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    console, window, CssStyleDeclaration, Document, Element, Event, FormData, HtmlButtonElement,
    HtmlElement, HtmlFormElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::page::{
    parse_delay_attr, progress_delay_ms, project_cards, reply_notification, scroll_styles,
    ContactReply, HeroTracker, HeroTransition, NotificationKind, Project, ThrottleWindow,
    CONTACT_ENDPOINT, CONTACT_NETWORK_ERROR, ENTRANCE_ROOT_MARGIN, ENTRANCE_THRESHOLD,
    NOTIFICATION_BASE_STYLE, NOTIFICATION_OFFSCREEN_TRANSFORM, NOTIFICATION_ONSCREEN_TRANSFORM,
    NOTIFICATION_SLIDE_IN_DELAY_MS, NOTIFICATION_SLIDE_OUT_MS, NOTIFICATION_TTL_MS,
    PROJECTS_ENDPOINT, SCROLL_THROTTLE_WINDOW_MS, SENDING_LABEL, TYPING_ANIMATION,
    TYPING_RESTART_TICK_MS,
};

pub fn run() {
    let Some(document) = window().and_then(|w| w.document()) else {
        return;
    };

    if document.ready_state() == "loading" {
        let deferred = document.clone();
        let on_ready = Closure::<dyn FnMut()>::new(move || boot(&deferred));
        let _ = document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref());
        on_ready.forget();
    } else {
        boot(&document);
    }
}

fn boot(document: &Document) {
    if let Err(error) = init(document) {
        console::error_2(&JsValue::from_str("portfolio init failed:"), &error);
    }
}

fn init(document: &Document) -> Result<(), JsValue> {
    init_navigation(document)?;
    init_entrance_animations(document)?;
    spawn_local(load_projects(document.clone()));
    init_scroll_effects(document)?;
    init_contact_form(document)?;
    init_hover_effects(document)?;
    init_typing_restart(document)?;
    init_throttled_scroll()?;
    Ok(())
}

fn init_navigation(document: &Document) -> Result<(), JsValue> {
    let menu_toggle = document
        .query_selector(".menu-toggle")?
        .ok_or_else(|| JsValue::from_str("missing .menu-toggle"))?;
    let nav_links = document
        .query_selector(".nav-links")?
        .ok_or_else(|| JsValue::from_str("missing .nav-links"))?;

    {
        let nav_links = nav_links.clone();
        let on_toggle = Closure::<dyn FnMut()>::new(move || {
            let _ = nav_links.class_list().toggle("active");
        });
        menu_toggle.add_event_listener_with_callback("click", on_toggle.as_ref().unchecked_ref())?;
        on_toggle.forget();
    }

    let anchors = document.query_selector_all(r##"a[href^="#"]"##)?;
    for index in 0..anchors.length() {
        let Some(anchor) = anchors
            .get(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };

        let document = document.clone();
        let nav_links = nav_links.clone();
        let link = anchor.clone();
        let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            if let Some(fragment) = link.get_attribute("href") {
                // a bare "#" is not a valid selector; its Err lands in the same skip
                if let Ok(Some(target)) = document.query_selector(&fragment) {
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(ScrollBehavior::Smooth);
                    options.set_block(ScrollLogicalPosition::Start);
                    target.scroll_into_view_with_scroll_into_view_options(&options);
                }
            }
            let _ = nav_links.class_list().remove_1("active");
        });
        anchor.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    Ok(())
}

fn init_entrance_animations(document: &Document) -> Result<(), JsValue> {
    let document_for_entries = document.clone();
    let on_intersect = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let element = entry.target();
                // each element animates at most once
                observer.unobserve(&element);
                reveal(&document_for_entries, &element);
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(ENTRANCE_THRESHOLD));
    options.set_root_margin(ENTRANCE_ROOT_MARGIN);
    let observer =
        IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &options)?;
    on_intersect.forget();

    let animated = document
        .query_selector_all(".fade-in-up, .slide-in-left, .slide-in-right, .skills-container")?;
    for index in 0..animated.length() {
        if let Some(element) = animated
            .get(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        {
            observer.observe(&element);
        }
    }

    // the observer lives for the lifetime of the page
    std::mem::forget(observer);
    Ok(())
}

fn reveal(document: &Document, element: &Element) {
    let class_list = element.class_list();

    if class_list.contains("fade-in-up") {
        let delay = parse_delay_attr(element.get_attribute("data-delay").as_deref());
        let element = element.clone();
        Timeout::new(delay, move || apply_entrance(&element, "translateY(0)")).forget();
    } else if class_list.contains("slide-in-left") || class_list.contains("slide-in-right") {
        apply_entrance(element, "translateX(0)");
    }

    if class_list.contains("skills-container") {
        animate_progress_bars(document);
    }
}

fn apply_entrance(element: &Element, transform: &str) {
    let Some(style) = inline_style(element) else {
        return;
    };
    let _ = style.set_property("animation-delay", "0s");
    let _ = style.set_property("opacity", "1");
    let _ = style.set_property("transform", transform);
}

fn animate_progress_bars(document: &Document) {
    let Ok(fills) = document.query_selector_all(".progress-fill") else {
        return;
    };
    for index in 0..fills.length() {
        let Some(fill) = fills
            .get(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        Timeout::new(progress_delay_ms(index as usize), move || {
            let Some(width) = fill.get_attribute("data-width") else {
                return;
            };
            if let Some(style) = inline_style(&fill) {
                let _ = style.set_property("width", &format!("{width}%"));
            }
        })
        .forget();
    }
}

async fn load_projects(document: Document) {
    match fetch_projects().await {
        Ok(projects) => render_projects(&document, &projects),
        Err(error) => {
            console::error_1(&JsValue::from_str(&format!("error fetching projects: {error}")))
        }
    }
}

async fn fetch_projects() -> Result<Vec<Project>, gloo_net::Error> {
    let response = Request::get(PROJECTS_ENDPOINT).send().await?;
    if !response.ok() {
        return Err(gloo_net::Error::GlooError(format!(
            "projects request failed with status {}",
            response.status()
        )));
    }
    response.json::<Vec<Project>>().await
}

fn render_projects(document: &Document, projects: &[Project]) {
    let Ok(Some(grid)) = document.query_selector("#portfolio .grid") else {
        return;
    };
    grid.set_inner_html("");

    for card in project_cards(projects) {
        let Ok(element) = document.create_element("div") else {
            continue;
        };
        element.set_class_name(card.class_name);
        let _ = element.set_attribute("data-delay", &card.delay_ms.to_string());
        element.set_inner_html(&card.html);
        let _ = grid.append_child(&element);
    }
}

fn init_scroll_effects(document: &Document) -> Result<(), JsValue> {
    let Some(window) = window() else {
        return Ok(());
    };

    let document = document.clone();
    let scroll_window = window.clone();
    let on_scroll = Closure::<dyn FnMut()>::new(move || {
        let scrolled = scroll_window.page_y_offset().unwrap_or(0.0);
        let styles = scroll_styles(scrolled);

        if let Ok(Some(parallax)) = document.query_selector(".parallax-bg") {
            if let Some(style) = inline_style(&parallax) {
                let _ = style.set_property("transform", &styles.parallax_transform);
            }
        }

        if let Ok(Some(navbar)) = document.query_selector(".glass-nav") {
            if let Some(style) = inline_style(&navbar) {
                let _ = style.set_property("background", &styles.navbar_background);
            }
        }
    });
    window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    on_scroll.forget();
    Ok(())
}

fn init_contact_form(document: &Document) -> Result<(), JsValue> {
    let form: HtmlFormElement = document
        .get_element_by_id("contactForm")
        .ok_or_else(|| JsValue::from_str("missing #contactForm"))?
        .dyn_into()?;

    let submit_form = form.clone();
    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        let form = submit_form.clone();
        spawn_local(async move {
            submit_contact(&form).await;
        });
    });
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();
    Ok(())
}

async fn submit_contact(form: &HtmlFormElement) {
    let Some(document) = form.owner_document() else {
        return;
    };

    let submit_button = form
        .query_selector(r#"button[type="submit"]"#)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlButtonElement>().ok());
    let original_label = submit_button.as_ref().and_then(|button| button.text_content());

    if let Some(button) = submit_button.as_ref() {
        button.set_text_content(Some(SENDING_LABEL));
        button.set_disabled(true);
    }

    match send_contact_request(&collect_form_fields(form)).await {
        ContactSubmitStatus::Replied { accepted, reply } => {
            let (kind, message) = reply_notification(accepted, &reply);
            show_notification(&document, &message, kind);
            if accepted {
                form.reset();
            }
        }
        ContactSubmitStatus::Unreachable => {
            show_notification(&document, CONTACT_NETWORK_ERROR, NotificationKind::Error);
        }
    }

    // restored on every path out of the submission
    if let Some(button) = submit_button.as_ref() {
        button.set_text_content(original_label.as_deref());
        button.set_disabled(false);
    }
}

enum ContactSubmitStatus {
    Replied { accepted: bool, reply: ContactReply },
    Unreachable,
}

async fn send_contact_request(fields: &BTreeMap<String, String>) -> ContactSubmitStatus {
    let request = match Request::post(CONTACT_ENDPOINT).json(fields) {
        Ok(request) => request,
        Err(_) => return ContactSubmitStatus::Unreachable,
    };
    let response = match request.send().await {
        Ok(response) => response,
        Err(_) => return ContactSubmitStatus::Unreachable,
    };
    let accepted = response.ok();
    match response.json::<ContactReply>().await {
        Ok(reply) => ContactSubmitStatus::Replied { accepted, reply },
        Err(_) => ContactSubmitStatus::Unreachable,
    }
}

fn collect_form_fields(form: &HtmlFormElement) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let Ok(data) = FormData::new_with_form(form) else {
        return fields;
    };

    let entries = data.entries();
    loop {
        let Ok(next) = entries.next() else {
            break;
        };
        if next.done() {
            break;
        }
        let pair = Array::from(&next.value());
        if let (Some(key), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
            fields.insert(key, value);
        }
    }
    fields
}

fn show_notification(document: &Document, message: &str, kind: NotificationKind) {
    let Some(body) = document.body() else {
        return;
    };
    let Ok(notification) = document.create_element("div") else {
        return;
    };
    notification.set_class_name(&format!("notification {}", kind.as_str()));
    let _ = notification.set_attribute("style", NOTIFICATION_BASE_STYLE);

    let Ok(content) = document.create_element("div") else {
        return;
    };
    content.set_class_name("notification-content");

    let Ok(text) = document.create_element("span") else {
        return;
    };
    text.set_text_content(Some(message));

    let Ok(close_button) = document.create_element("button") else {
        return;
    };
    close_button.set_class_name("notification-close");
    close_button.set_text_content(Some("\u{d7}"));

    let _ = content.append_child(&text);
    let _ = content.append_child(&close_button);
    let _ = notification.append_child(&content);
    if body.append_child(&notification).is_err() {
        return;
    }

    {
        let notification = notification.clone();
        Timeout::new(NOTIFICATION_SLIDE_IN_DELAY_MS, move || {
            if let Some(style) = inline_style(&notification) {
                let _ = style.set_property("transform", NOTIFICATION_ONSCREEN_TRANSFORM);
            }
        })
        .forget();
    }

    let auto_dismiss: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

    {
        let notification = notification.clone();
        let auto_dismiss = auto_dismiss.clone();
        let on_close = Closure::<dyn FnMut()>::new(move || {
            // cancel the pending auto-dismiss so only one removal path stays live
            auto_dismiss.borrow_mut().take();
            dismiss_notification(&notification);
        });
        let _ = close_button
            .add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref());
        on_close.forget();
    }

    let dismissed = notification.clone();
    *auto_dismiss.borrow_mut() = Some(Timeout::new(NOTIFICATION_TTL_MS, move || {
        dismiss_notification(&dismissed)
    }));
}

fn dismiss_notification(notification: &Element) {
    // either trigger can fire after the other already removed the node
    if !notification.is_connected() {
        return;
    }
    if let Some(style) = inline_style(notification) {
        let _ = style.set_property("transform", NOTIFICATION_OFFSCREEN_TRANSFORM);
    }
    let notification = notification.clone();
    Timeout::new(NOTIFICATION_SLIDE_OUT_MS, move || {
        if notification.is_connected() {
            notification.remove();
        }
    })
    .forget();
}

fn init_hover_effects(document: &Document) -> Result<(), JsValue> {
    let targets = document.query_selector_all(".hover-lift, .btn-modern")?;
    for index in 0..targets.length() {
        let Some(element) = targets
            .get(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };

        let enter_target = element.clone();
        let on_enter = Closure::<dyn FnMut()>::new(move || {
            if let Some(style) = inline_style(&enter_target) {
                let _ = style.set_property("filter", "brightness(1.1)");
            }
        });
        element.add_event_listener_with_callback("mouseenter", on_enter.as_ref().unchecked_ref())?;
        on_enter.forget();

        let leave_target = element.clone();
        let on_leave = Closure::<dyn FnMut()>::new(move || {
            if let Some(style) = inline_style(&leave_target) {
                let _ = style.set_property("filter", "brightness(1)");
            }
        });
        element.add_event_listener_with_callback("mouseleave", on_leave.as_ref().unchecked_ref())?;
        on_leave.forget();
    }

    Ok(())
}

fn init_typing_restart(document: &Document) -> Result<(), JsValue> {
    let Some(window) = window() else {
        return Ok(());
    };

    let document = document.clone();
    let mut tracker = HeroTracker::new();
    let on_scroll = Closure::<dyn FnMut()>::new(move || {
        let Ok(Some(hero)) = document.query_selector(".hero") else {
            return;
        };
        let rect = hero.get_bounding_client_rect();
        if tracker.update(rect.top(), rect.bottom()) == Some(HeroTransition::Returned) {
            restart_typing_animation(&document);
        }
    });
    window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    on_scroll.forget();
    Ok(())
}

fn restart_typing_animation(document: &Document) {
    let Ok(Some(typing_text)) = document.query_selector(".typing-text") else {
        return;
    };
    let Some(style) = inline_style(&typing_text) else {
        return;
    };
    let _ = style.set_property("animation", "none");
    Timeout::new(TYPING_RESTART_TICK_MS, move || {
        let _ = style.set_property("animation", TYPING_ANIMATION);
    })
    .forget();
}

fn init_throttled_scroll() -> Result<(), JsValue> {
    let Some(window) = window() else {
        return Ok(());
    };

    let mut gate = ThrottleWindow::new(SCROLL_THROTTLE_WINDOW_MS);
    let on_scroll = Closure::<dyn FnMut()>::new(move || {
        if !gate.try_pass(Date::now()) {
            return;
        }
        // scroll work that needs rate limiting lands here
    });
    window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    on_scroll.forget();
    Ok(())
}

fn inline_style(element: &Element) -> Option<CssStyleDeclaration> {
    element.dyn_ref::<HtmlElement>().map(|element| element.style())
}

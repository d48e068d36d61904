use crate::core::script::{property_path, ScriptObject, ScriptValue};
use crate::domain::model::{Category, Service};

pub const CONFIG_VAR: &str = "iframemanagerconfig";
const EMBED_URL_PLACEHOLDER: &str = "{data-id}";
const IFRAME_ALLOW: &str = " accelerometer; encrypted-media; gyroscope; picture-in-picture; fullscreen; ";
const EMBED_COOKIE_PATH: &str = "/";

/// Embed fields holding a function expression instead of a URL.
pub fn is_callable(value: &str) -> bool {
    value.contains("function")
}

fn descriptor(service: &Service) -> ScriptObject {
    ScriptObject::new()
        .with("embedUrl", EMBED_URL_PLACEHOLDER)
        .with("iframe", ScriptObject::new().with("allow", IFRAME_ALLOW))
        .with(
            "cookie",
            ScriptObject::new()
                .with("name", service.identifier.as_str())
                .with("path", EMBED_COOKIE_PATH),
        )
        .with(
            "languages",
            ScriptObject::new().with(
                "en",
                ScriptObject::new()
                    .with("notice", service.embed.notice.as_str())
                    .with("loadBtn", service.embed.load_btn.as_str())
                    .with("loadAllBtn", service.embed.load_all_btn.as_str()),
            ),
        )
}

/// Assignments replacing descriptor fields with the service's callables.
fn callable_overrides(service: &Service) -> Vec<String> {
    [
        ("thumbnailUrl", &service.embed.thumbnail_url),
        ("embedUrl", &service.embed.embed_url),
    ]
    .into_iter()
    .filter(|(_, value)| is_callable(value))
    .map(|(field, value)| {
        let code = ScriptValue::Raw(value.trim().trim_end_matches(';').to_string());
        format!(
            "{} = {};",
            property_path(CONFIG_VAR, &["services", &service.identifier, field]),
            code.to_literal()
        )
    })
    .collect()
}

/// Embed manager configuration followed by `manager.run(...)`.
///
/// Empty when no category in `categories` has a service.
pub fn build_config(categories: &[Category]) -> String {
    let mut services = ScriptObject::new();
    let mut overrides = Vec::new();

    for service in categories.iter().flat_map(|category| &category.services) {
        services.insert(service.identifier.as_str(), descriptor(service));
        overrides.extend(callable_overrides(service));
    }

    if services.is_empty() {
        return String::new();
    }

    let config = ScriptValue::from(
        ScriptObject::new()
            .with("currLang", "en")
            .with("services", services),
    );
    format!(
        "var {var} = {config};{overrides}manager.run({var});",
        var = CONFIG_VAR,
        config = config.to_literal(),
        overrides = overrides.concat()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::EmbedSettings;

    fn category_with(services: Vec<Service>) -> Category {
        Category {
            identifier: "media".to_string(),
            services,
            ..Category::default()
        }
    }

    fn youtube() -> Service {
        Service {
            identifier: "youtube".to_string(),
            embed: EmbedSettings {
                notice: "Loads <b>YouTube</b>".to_string(),
                load_btn: "Load".to_string(),
                load_all_btn: "Always load".to_string(),
                thumbnail_url: "function(id, setThumbnail){ setThumbnail('https://i.ytimg.com/vi/' + id + '/hq.jpg'); };".to_string(),
                embed_url: "https://www.youtube-nocookie.com/embed/{data-id}".to_string(),
            },
            ..Service::default()
        }
    }

    #[test]
    fn test_no_services_means_no_config() {
        assert_eq!(build_config(&[]), "");
        assert_eq!(build_config(&[category_with(vec![])]), "");
    }

    #[test]
    fn test_descriptor_is_object_literal() {
        let out = build_config(&[category_with(vec![youtube()])]);
        assert!(out.starts_with(
            r#"var iframemanagerconfig = {currLang:"en",services:{youtube:{embedUrl:"{data-id}",iframe:{allow:" accelerometer; encrypted-media; gyroscope; picture-in-picture; fullscreen; "},cookie:{name:"youtube",path:"/"},languages:{en:{notice:"Loads \u003cb>YouTube\u003c/b>",loadBtn:"Load",loadAllBtn:"Always load"}}}}};"#
        ));
        assert!(out.ends_with("manager.run(iframemanagerconfig);"));
    }

    #[test]
    fn test_callable_fields_are_assigned_as_code() {
        let out = build_config(&[category_with(vec![youtube()])]);
        assert!(out.contains(
            "iframemanagerconfig.services.youtube.thumbnailUrl = function(id, setThumbnail){ setThumbnail('https://i.ytimg.com/vi/' + id + '/hq.jpg'); };"
        ));
        // plain URLs keep the placeholder
        assert!(!out.contains("services.youtube.embedUrl ="));
    }

    #[test]
    fn test_callable_embed_url_is_assigned_as_code() {
        let mut service = youtube();
        service.embed.thumbnail_url = "https://img.example/{data-id}.jpg".to_string();
        service.embed.embed_url =
            "function(id){ return 'https://www.youtube-nocookie.com/embed/' + id; };".to_string();
        let out = build_config(&[category_with(vec![service])]);

        assert!(out.contains(
            "iframemanagerconfig.services.youtube.embedUrl = function(id){ return 'https://www.youtube-nocookie.com/embed/' + id; };manager.run(iframemanagerconfig);"
        ));
        assert!(out.contains(r#"youtube:{embedUrl:"{data-id}","#));
        assert!(!out.contains("services.youtube.thumbnailUrl ="));
    }

    #[test]
    fn test_odd_identifiers_are_quoted() {
        let mut service = youtube();
        service.identifier = "google-maps".to_string();
        let out = build_config(&[category_with(vec![service])]);
        assert!(out.contains(r#"services:{"google-maps":{"#));
        assert!(out.contains(r#"iframemanagerconfig.services["google-maps"].thumbnailUrl = "#));
    }
}

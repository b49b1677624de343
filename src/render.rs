//! HTML pages and their translated strings
//!
//! Templates are embedded at compile time and registered once when the
//! application state is built. Handlebars escapes every interpolated value,
//! which matters for the destination URL shown on the interstitial page.

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use crate::config::{Config, Lang};
use crate::error::AppError;

const LANDING_TEMPLATE: &str = include_str!("templates/landing.hbs");
const ADMIN_TEMPLATE: &str = include_str!("templates/admin.hbs");
const INTERSTITIAL_TEMPLATE: &str = include_str!("templates/interstitial.hbs");
const NOT_FOUND_TEMPLATE: &str = include_str!("templates/not_found.hbs");
const FAVICON_PARTIAL: &str = include_str!("templates/favicon.hbs");

/// User-facing strings for one language
#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
    pub site_subtitle: &'static str,
    pub admin_title: &'static str,
    pub protected: &'static str,
    pub create_title: &'static str,
    pub label_slug: &'static str,
    pub label_target: &'static str,
    pub label_interstitial: &'static str,
    pub btn_save: &'static str,
    pub th_slug: &'static str,
    pub th_dest: &'static str,
    pub th_visits: &'static str,
    pub th_mode: &'static str,
    pub th_action: &'static str,
    pub loading: &'static str,
    pub no_links: &'static str,
    pub mode_mid: &'static str,
    pub mode_direct: &'static str,
    pub btn_edit: &'static str,
    pub btn_delete: &'static str,
    pub confirm_del: &'static str,
    pub inter_title: &'static str,
    pub inter_msg: &'static str,
    pub btn_continue: &'static str,
    pub not_found_title: &'static str,
    pub not_found_msg: &'static str,
    pub btn_home: &'static str,
}

static EN: Messages = Messages {
    site_subtitle: "A simple, self-hosted short link service.",
    admin_title: "Short Link Manager",
    protected: "Protected Area",
    create_title: "Create New Link",
    label_slug: "Slug (Short Path)",
    label_target: "Target URL",
    label_interstitial: "Interstitial Page",
    btn_save: "Save",
    th_slug: "Slug",
    th_dest: "Destination",
    th_visits: "Visits",
    th_mode: "Mode",
    th_action: "Actions",
    loading: "Loading links...",
    no_links: "No links found.",
    mode_mid: "Interstitial",
    mode_direct: "Direct",
    btn_edit: "Edit",
    btn_delete: "Delete",
    confirm_del: "Delete /",
    inter_title: "Redirecting",
    inter_msg: "You are about to be redirected to an external website.",
    btn_continue: "Continue to Site",
    not_found_title: "Link Not Found",
    not_found_msg: "The short link you are looking for does not exist.",
    btn_home: "Go Home",
};

static ZH: Messages = Messages {
    site_subtitle: "一个简单的自托管短链接服务。",
    admin_title: "短链接管理后台",
    protected: "Protected Area",
    create_title: "新建/修改短链接",
    label_slug: "短链后缀 (Slug)",
    label_target: "目标跳转地址 (URL)",
    label_interstitial: "启用中间页",
    btn_save: "保存配置",
    th_slug: "后缀路径",
    th_dest: "目标地址",
    th_visits: "访问次数",
    th_mode: "跳转模式",
    th_action: "操作",
    loading: "正在加载数据...",
    no_links: "暂无短链接数据",
    mode_mid: "中间页",
    mode_direct: "直接跳转",
    btn_edit: "编辑",
    btn_delete: "删除",
    confirm_del: "确认删除短链 /",
    inter_title: "即将重定向",
    inter_msg: "您即将被重定向到外部网站，请注意信息安全。",
    btn_continue: "继续访问",
    not_found_title: "链接不存在",
    not_found_msg: "您访问的短链接不存在或已被删除。",
    btn_home: "返回首页",
};

impl Messages {
    pub fn for_lang(lang: Lang) -> &'static Messages {
        match lang {
            Lang::En => &EN,
            Lang::Zh => &ZH,
        }
    }
}

/// Compiled page templates
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_partial("favicon", FAVICON_PARTIAL)?;
        registry.register_template_string("landing", LANDING_TEMPLATE)?;
        registry.register_template_string("admin", ADMIN_TEMPLATE)?;
        registry.register_template_string("interstitial", INTERSTITIAL_TEMPLATE)?;
        registry.register_template_string("not_found", NOT_FOUND_TEMPLATE)?;
        Ok(Pages { registry })
    }

    pub fn landing(&self, config: &Config) -> Result<String, AppError> {
        let t = Messages::for_lang(config.lang);
        let subtitle = config.site_subtitle.as_deref().unwrap_or(t.site_subtitle);
        self.render(
            "landing",
            &json!({
                "lang": config.lang.code(),
                "title": config.site_title,
                "subtitle": subtitle,
            }),
        )
    }

    pub fn admin(&self, lang: Lang) -> Result<String, AppError> {
        self.render("admin", &json!({ "lang": lang.code(), "t": Messages::for_lang(lang) }))
    }

    pub fn interstitial(&self, lang: Lang, target: &str) -> Result<String, AppError> {
        self.render(
            "interstitial",
            &json!({ "lang": lang.code(), "t": Messages::for_lang(lang), "target": target }),
        )
    }

    pub fn not_found(&self, lang: Lang) -> Result<String, AppError> {
        self.render("not_found", &json!({ "lang": lang.code(), "t": Messages::for_lang(lang) }))
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> Result<String, AppError> {
        Ok(self.registry.render(name, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_renders_in_both_languages() {
        let pages = Pages::new().unwrap();
        for lang in [Lang::En, Lang::Zh] {
            assert!(pages.admin(lang).unwrap().contains(Messages::for_lang(lang).admin_title));
            assert!(pages.not_found(lang).unwrap().contains(Messages::for_lang(lang).not_found_title));
            assert!(pages.interstitial(lang, "https://a.com").unwrap().contains("https://a.com"));
        }
    }

    #[test]
    fn interstitial_escapes_target() {
        let pages = Pages::new().unwrap();
        let html = pages
            .interstitial(Lang::En, "https://a.com/\"><script>alert(1)</script>")
            .unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn landing_uses_configured_branding() {
        let pages = Pages::new().unwrap();
        let config = Config::from_lookup(|key| match key {
            "SITE_TITLE" => Some("My Links".to_string()),
            "LANG" => Some("zh".to_string()),
            _ => None,
        });
        let html = pages.landing(&config).unwrap();
        assert!(html.contains("My Links"));
        assert!(html.contains(ZH.site_subtitle));
        assert!(html.contains("lang=\"zh\""));
    }
}

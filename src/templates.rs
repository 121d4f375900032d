//! Built-in HTML email templates.
//!
//! Static template strings with `{{placeholder}}` substitution. These are
//! the house templates the quick-send flow offers alongside whatever lives
//! in MailerLite.

use std::collections::BTreeMap;

use serde::Serialize;

/// A named built-in template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltinTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    pub html: &'static str,
}

const NEWSLETTER_HTML: &str = r#"<!DOCTYPE html>
<html>
  <body style="font-family: Georgia, serif; color: #1f2937; max-width: 600px; margin: 0 auto;">
    <h1 style="color: #0f4c81;">{{practice_name}}</h1>
    <h2>{{headline}}</h2>
    <p>Dear {{first_name}},</p>
    <div>{{body}}</div>
    <p style="margin-top: 24px;">Warm regards,<br/>{{advisor_name}}</p>
    <hr/>
    <p style="font-size: 11px; color: #6b7280;">
      This message is for informational purposes only and is not investment advice.
    </p>
  </body>
</html>"#;

const MARKET_UPDATE_HTML: &str = r#"<!DOCTYPE html>
<html>
  <body style="font-family: Georgia, serif; color: #1f2937; max-width: 600px; margin: 0 auto;">
    <h1 style="color: #0f4c81;">Market Update — {{month}}</h1>
    <p>Dear {{first_name}},</p>
    <div>{{body}}</div>
    <p>If you would like to discuss how this affects your portfolio, reply to this
       email or call the office.</p>
    <p>Warm regards,<br/>{{advisor_name}}</p>
  </body>
</html>"#;

const MILESTONE_HTML: &str = r#"<!DOCTYPE html>
<html>
  <body style="font-family: Georgia, serif; color: #1f2937; max-width: 600px; margin: 0 auto;">
    <h1 style="color: #0f4c81;">{{occasion}}</h1>
    <p>Dear {{first_name}},</p>
    <p>{{message}}</p>
    <p>With best wishes,<br/>{{advisor_name}}<br/>{{practice_name}}</p>
  </body>
</html>"#;

/// The built-in template catalog.
pub fn builtin_templates() -> Vec<BuiltinTemplate> {
    vec![
        BuiltinTemplate {
            id: "newsletter",
            name: "Client Newsletter",
            description: "General-purpose newsletter with headline and body",
            html: NEWSLETTER_HTML,
        },
        BuiltinTemplate {
            id: "market-update",
            name: "Market Update",
            description: "Monthly market commentary",
            html: MARKET_UPDATE_HTML,
        },
        BuiltinTemplate {
            id: "milestone",
            name: "Client Milestone",
            description: "Anniversary or birthday note",
            html: MILESTONE_HTML,
        },
    ]
}

pub fn builtin_template(id: &str) -> Option<BuiltinTemplate> {
    builtin_templates().into_iter().find(|t| t.id == id)
}

/// Substitute `{{key}}` placeholders.
///
/// Unknown placeholders are left in place so a half-filled template is
/// visible in preview rather than silently blanked.
pub fn render(template: &str, values: &BTreeMap<String, String>) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{{{}}}}}", key), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let mut values = BTreeMap::new();
        values.insert("first_name".to_string(), "Dana".to_string());
        values.insert("advisor_name".to_string(), "Glenn".to_string());
        let out = render("Dear {{first_name}}, — {{advisor_name}}", &values);
        assert_eq!(out, "Dear Dana, — Glenn");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let out = render("Hello {{first_name}}", &BTreeMap::new());
        assert_eq!(out, "Hello {{first_name}}");
    }

    #[test]
    fn test_builtin_catalog_lookup() {
        assert_eq!(builtin_templates().len(), 3);
        assert!(builtin_template("market-update").is_some());
        assert!(builtin_template("nope").is_none());
    }

    #[test]
    fn test_builtin_templates_carry_expected_placeholders() {
        let t = builtin_template("newsletter").unwrap();
        assert!(t.html.contains("{{first_name}}"));
        assert!(t.html.contains("{{practice_name}}"));
    }
}

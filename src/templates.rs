//! Minijinja template engine configuration with compiled-in templates.

use anyhow::Result;
use minijinja::Environment;

/// Build the template environment with the page templates compiled in
pub fn build_env(version: String) -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_global("version", version);
    env.add_template("index.html", include_str!("../templates/index.html"))?;
    env.add_template("dashboard.html", include_str!("../templates/dashboard.html"))?;
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_index_renders_sign_in_cards() {
        let env = build_env("test".to_string()).unwrap();
        let rendered = env
            .get_template("index.html")
            .unwrap()
            .render(context! {
                title => "Microsoft Identity Demo",
                user => minijinja::Value::UNDEFINED,
                error => minijinja::Value::UNDEFINED,
                oauth2_enabled => true,
                b2c_enabled => true,
                entra_enabled => true,
            })
            .unwrap();

        assert!(rendered.contains("/auth/oauth2/login"));
        assert!(rendered.contains("/auth/b2c/login"));
        assert!(rendered.contains("/auth/entra/login"));
    }

    #[test]
    fn test_index_renders_error_banner() {
        let env = build_env("test".to_string()).unwrap();
        let rendered = env
            .get_template("index.html")
            .unwrap()
            .render(context! {
                title => "Microsoft Identity Demo",
                user => minijinja::Value::UNDEFINED,
                error => "invalid_state",
                oauth2_enabled => true,
                b2c_enabled => false,
                entra_enabled => false,
            })
            .unwrap();

        assert!(rendered.contains("invalid_state"));
        assert!(!rendered.contains("/auth/b2c/login"));
    }

    #[test]
    fn test_dashboard_renders_profile() {
        let env = build_env("test".to_string()).unwrap();
        let rendered = env
            .get_template("dashboard.html")
            .unwrap()
            .render(context! {
                title => "Dashboard",
                user => context! {
                    user_id => "user-1",
                    email => "user@example.com",
                    name => "Test User",
                },
                token_expires => "2026-01-01T00:00:00+00:00",
            })
            .unwrap();

        assert!(rendered.contains("Test User"));
        assert!(rendered.contains("user@example.com"));
        assert!(rendered.contains("/auth/logout"));
    }
}

use crate::{Result, gateway::ModelView};
use minijinja::Environment;
use std::sync::OnceLock;

const VIEWER_TEMPLATE_NAME: &str = "viewer.html";
const VIEWER_TEMPLATE: &str = include_str!("../../templates/viewer.html");

static VIEWER_ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn environment() -> &'static Environment<'static> {
    VIEWER_ENV.get_or_init(|| {
        let mut env = Environment::new();
        if let Err(err) = env.add_template(VIEWER_TEMPLATE_NAME, VIEWER_TEMPLATE) {
            tracing::error!("viewer template failed to compile: {err}");
        }
        env
    })
}

pub fn render(view: &ModelView) -> Result<String> {
    Ok(environment()
        .get_template(VIEWER_TEMPLATE_NAME)?
        .render(view)?)
}

use crate::config::MapConfig;
use crate::error::MapResult;
use crate::processing::ComposedMap;
use minijinja::{context, Environment};

static MAP_TMPL: &str = include_str!("./templates/map.html");
static PAGE_TMPL: &str = include_str!("./templates/page.html");

/// Turns a [`ComposedMap`] into HTML. Both templates are `.html`, so
/// minijinja auto-escapes everything that is not passed through `tojson`.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> MapResult<Self> {
        let mut env = Environment::new();
        env.add_template("map.html", MAP_TMPL)?;
        env.add_template("page.html", PAGE_TMPL)?;
        Ok(Self { env })
    }

    /// Standalone Leaflet document for the map alone.
    pub fn render_map(&self, map: &ComposedMap<'_>) -> MapResult<String> {
        let tmpl = self.env.get_template("map.html")?;
        Ok(tmpl.render(context! { map => map })?)
    }

    /// Host page with the map document embedded at a fixed height.
    pub fn render_page(&self, map: &ComposedMap<'_>, settings: &MapConfig) -> MapResult<String> {
        let map_html = self.render_map(map)?;
        let tmpl = self.env.get_template("page.html")?;
        Ok(tmpl.render(context! {
            title => &settings.page_title,
            icon => &settings.page_icon,
            heading => &settings.heading,
            subheading => &settings.subheading,
            height => settings.height_px,
            map_html => map_html,
        })?)
    }
}

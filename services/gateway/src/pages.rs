//! HTML pages for browser users

use agripredict_common::{CROPS, DISTRICTS};

use crate::chart::statistics_chart;
use crate::models::StatisticsSummary;
use crate::utils::{escape_html, thousands, truncate};

const STYLE: &str = "body{font-family:sans-serif;margin:2rem auto;max-width:48rem;color:#222}\
nav a{margin-right:1rem}label{display:block;margin-top:.75rem}\
input,select{padding:.3rem;min-width:16rem}button{margin-top:1rem;padding:.4rem 1.2rem}\
pre{background:#f4f6f4;padding:1rem;border-left:4px solid #2d8659;white-space:pre-wrap}\
table{border-collapse:collapse}td{padding:.3rem 1rem .3rem 0}";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | AgriPredict</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a><a href=\"/cropyield\">Estimation</a>\
         <a href=\"/cropregistration\">Registration</a><a href=\"/currentstatistics\">Statistics</a>\
         <a href=\"/recommendfile\">Crop Advice</a><a href=\"/fertilizersfile\">Fertilizer Advice</a></nav>\n\
         <h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// Landing page
#[must_use]
pub fn landing_page() -> String {
    layout(
        "AgriPredict",
        "<p>Yield, price and demand estimates for Telangana districts, \
         plus crop and fertilizer advice from soil readings.</p>\n<ul>\n\
         <li><a href=\"/cropyield\">Estimate production and revenue</a></li>\n\
         <li><a href=\"/cropregistration\">Register a crop</a></li>\n\
         <li><a href=\"/currentstatistics\">Registered production against demand</a></li>\n\
         <li><a href=\"/recommendfile\">Which crop suits my soil?</a></li>\n\
         <li><a href=\"/fertilizersfile\">Which fertilizer should I use?</a></li>\n</ul>",
    )
}

/// Input widget of a form field
#[derive(Debug, Clone, Copy)]
enum Input {
    Crop,
    District,
    Number,
    Decimal,
    Text,
}

#[derive(Debug, Clone, Copy)]
struct Field {
    name: &'static str,
    label: &'static str,
    input: Input,
}

const fn field(name: &'static str, label: &'static str, input: Input) -> Field {
    Field { name, label, input }
}

/// Browser form pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPage {
    CropYield,
    CropRegistration,
    CurrentStatistics,
    Recommend,
    Fertilizers,
}

impl FormPage {
    const fn title(self) -> &'static str {
        match self {
            Self::CropYield => "Crop Yield Estimation",
            Self::CropRegistration => "Crop Registration",
            Self::CurrentStatistics => "Current Statistics",
            Self::Recommend => "Crop Recommendation",
            Self::Fertilizers => "Fertilizer Recommendation",
        }
    }

    /// Form post target
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::CropYield => "/estimation",
            Self::CropRegistration => "/registration",
            Self::CurrentStatistics => "/statistics",
            Self::Recommend => "/recommend",
            Self::Fertilizers => "/fertilizers",
        }
    }

    fn fields(self) -> Vec<Field> {
        match self {
            Self::CropYield => vec![
                field("dist", "District", Input::District),
                field("crop", "Crop", Input::Crop),
                field("area", "Area (acres)", Input::Number),
            ],
            Self::CropRegistration => vec![
                field("user", "Name", Input::Text),
                field("dist", "District", Input::District),
                field("crop", "Crop", Input::Crop),
                field("area", "Area (acres)", Input::Number),
            ],
            Self::CurrentStatistics => vec![field("crop", "Crop", Input::Crop)],
            Self::Recommend => vec![
                field("n", "Nitrogen (mg/kg)", Input::Number),
                field("p", "Phosphorus (mg/kg)", Input::Number),
                field("k", "Potassium (mg/kg)", Input::Number),
                field("temp", "Temperature (\u{b0}C)", Input::Number),
                field("h", "Humidity (%)", Input::Number),
                field("ph", "pH", Input::Decimal),
                field("rain", "Rainfall (mm)", Input::Number),
            ],
            Self::Fertilizers => vec![
                field("temp", "Temperature (\u{b0}C)", Input::Number),
                field("h", "Humidity (%)", Input::Number),
                field("mc", "Moisture content", Input::Number),
                field("crop", "Crop type code", Input::Number),
                field("n", "Nitrogen (mg/kg)", Input::Number),
                field("p", "Phosphorus (mg/kg)", Input::Number),
                field("k", "Potassium (mg/kg)", Input::Number),
            ],
        }
    }
}

fn render_field(field: Field) -> String {
    let widget = match field.input {
        Input::Crop => select(field.name, CROPS.iter().map(|c| (c.id, c.display_name))),
        Input::District => select(field.name, DISTRICTS.iter().map(|d| (d.id, d.display_name))),
        Input::Number => format!(r#"<input type="number" name="{}" step="1" required>"#, field.name),
        Input::Decimal => format!(r#"<input type="number" name="{}" step="any" required>"#, field.name),
        Input::Text => format!(r#"<input type="text" name="{}" required>"#, field.name),
    };
    format!("<label>{}<br>{widget}</label>", escape_html(field.label))
}

fn select(name: &str, options: impl Iterator<Item = (i64, &'static str)>) -> String {
    let options: String = options
        .map(|(id, label)| format!(r#"<option value="{id}">{}</option>"#, escape_html(label)))
        .collect();
    format!(r#"<select name="{name}" required>{options}</select>"#)
}

/// Input form
#[must_use]
pub fn form_page(page: FormPage) -> String {
    let fields: String = page.fields().into_iter().map(render_field).collect();
    layout(
        page.title(),
        &format!(
            r#"<form method="post" action="{}">{fields}<button type="submit">Submit</button></form>"#,
            page.action()
        ),
    )
}

/// Text report or message
#[must_use]
pub fn result_page(text: &str) -> String {
    layout("Result", &format!("<pre>{}</pre>", escape_html(text)))
}

/// Production vs demand with the embedded chart
#[must_use]
pub fn statistics_page(summary: &StatisticsSummary) -> String {
    let body = format!(
        "<table>\n\
         <tr><td>Current production</td><td>{} Quintals</td></tr>\n\
         <tr><td>Expected demand</td><td>{} Quintals</td></tr>\n\
         <tr><td>Production gap</td><td>{} Quintals</td></tr>\n\
         <tr><td>Status</td><td>{}</td></tr>\n\
         </table>\n\
         <img alt=\"Production vs demand chart\" src=\"{}\">",
        thousands(truncate(summary.current_production)),
        thousands(truncate(summary.expected_demand)),
        thousands(truncate(summary.production_gap)),
        summary.status(),
        statistics_chart(summary),
    );
    layout(&format!("{} Statistics", summary.crop.display_name), &body)
}

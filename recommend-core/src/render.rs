//! HTML fragments for a successful `/recommend` response.
//!
//! Every string coming from the server is escaped before it is placed in markup.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::model::{
    Measurement, Product, ProductRecommendation, Recommendation, TripRecommendation, Weather,
};

pub const NO_RECOMMENDATIONS: &str = "<p>No recommendations generated</p>";
pub const NO_PRODUCTS: &str = r#"<p class="no-products">No product details found</p>"#;
pub const WEATHER_UNAVAILABLE: &str =
    r#"<p class="weather-unavailable">Weather data unavailable</p>"#;
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/static/no-image.png";

const STAR_SLOTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Image shown when a product has no thumbnail or it fails to load.
    pub placeholder_image: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// Full results fragment for either variant.
pub fn render(recommendation: &Recommendation, options: &RenderOptions) -> String {
    match recommendation {
        Recommendation::Products(products) => render_products(products, options),
        Recommendation::Trip(trip) => render_trip(trip),
    }
}

fn render_products(rec: &ProductRecommendation, options: &RenderOptions) -> String {
    format!(
        "<div id=\"textRecommendations\">{}</div>\n<div id=\"productsGrid\">{}</div>",
        text_block(rec.text_recommendations.as_deref()),
        products_grid(&rec.products, options),
    )
}

fn render_trip(rec: &TripRecommendation) -> String {
    format!(
        "<div class=\"trip-summary\">\
         <span class=\"trip-location\">Location: {}</span>\
         <span class=\"trip-season\">Season: {}</span>\
         </div>\n<div id=\"weatherInfo\">{}</div>\n<div id=\"recommendations\">{}</div>",
        encode_text(&rec.location),
        encode_text(&rec.season),
        weather_block(&rec.weather),
        text_block(rec.recommendations.as_deref()),
    )
}

/// Free text with newlines turned into `<br>`, or the placeholder when absent.
pub fn text_block(text: Option<&str>) -> String {
    match text {
        Some(text) if !text.is_empty() => encode_text(text).replace('\n', "<br>"),
        _ => NO_RECOMMENDATIONS.to_string(),
    }
}

/// Number of filled stars for a rating out of five.
pub fn filled_stars(rating: f64) -> usize {
    if rating.is_nan() {
        return 0;
    }
    rating.round().clamp(0.0, STAR_SLOTS as f64) as usize
}

pub fn star_rating(rating: f64) -> String {
    let filled = filled_stars(rating);
    format!("{}{}", "★".repeat(filled), "☆".repeat(STAR_SLOTS - filled))
}

pub fn product_card(product: &Product, options: &RenderOptions) -> String {
    let placeholder = encode_double_quoted_attribute(&options.placeholder_image);
    let src = match product.thumbnail.as_deref() {
        Some(thumb) if !thumb.is_empty() => encode_double_quoted_attribute(thumb),
        _ => placeholder.clone(),
    };
    let brand = product
        .brand
        .as_deref()
        .filter(|b| !b.is_empty())
        .unwrap_or("Unknown");

    format!(
        r#"<div class="product-card">
    <div class="product-image-container">
        <img src="{src}" alt="{alt}" class="product-image"
             onerror="this.onerror=null;this.src='{placeholder}'">
    </div>
    <div class="product-details">
        <h3 class="product-title">{title}</h3>
        <div class="product-brand">Brand: {brand}</div>
        <div class="product-price">${price:.2}</div>
        <div class="product-stock">Stock: {stock}</div>
        <div class="product-rating">{stars} ({rating:.1})</div>
        <p class="product-description">{description}</p>
    </div>
</div>"#,
        alt = encode_double_quoted_attribute(&product.title),
        title = encode_text(&product.title),
        brand = encode_text(brand),
        price = product.price,
        stock = product.stock,
        stars = star_rating(product.rating),
        rating = product.rating,
        description = encode_text(&product.description),
    )
}

pub fn products_grid(products: &[Product], options: &RenderOptions) -> String {
    if products.is_empty() {
        return NO_PRODUCTS.to_string();
    }

    products
        .iter()
        .map(|p| product_card(p, options))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn weather_block(weather: &Weather) -> String {
    if !weather.is_available() {
        return WEATHER_UNAVAILABLE.to_string();
    }

    let mut rows = vec![
        weather_row("Temperature", &measurement(&weather.temperature, "°C")),
        weather_row("Feels like", &measurement(&weather.feels_like, "°C")),
        weather_row("Conditions", &measurement(&weather.conditions, "")),
        weather_row("Humidity", &percent(&weather.humidity)),
        weather_row("Wind", &measurement(&weather.wind_speed, " km/h")),
        weather_row("Precipitation", &measurement(&weather.precipitation, " mm")),
    ];

    if let Some(uv) = weather.uv_index.as_ref().and_then(Measurement::as_f64) {
        rows.push(weather_row("UV index", &format!("{uv:.1} ({})", uv_risk(uv))));
    }

    if let Some(is_day) = weather.is_day {
        rows.push(weather_row("Time", if is_day { "Day" } else { "Night" }));
    }

    format!("<ul class=\"weather-details\">\n{}\n</ul>", rows.join("\n"))
}

/// Exposure band for a UV index reading.
pub fn uv_risk(uv_index: f64) -> &'static str {
    match uv_index {
        x if x <= 2.0 => "Low",
        x if x <= 5.0 => "Moderate",
        x if x <= 7.0 => "High",
        x if x <= 10.0 => "Very High",
        _ => "Extreme",
    }
}

fn weather_row(label: &str, value: &str) -> String {
    format!("    <li><span class=\"weather-label\">{label}:</span> {value}</li>")
}

fn measurement(m: &Measurement, unit: &str) -> String {
    match m {
        Measurement::Number(n) => format!("{n:.1}{unit}"),
        Measurement::Text(t) => encode_text(t).into_owned(),
    }
}

fn percent(m: &Measurement) -> String {
    match m {
        Measurement::Number(n) => format!("{n:.0}%"),
        Measurement::Text(t) => encode_text(t).into_owned(),
    }
}

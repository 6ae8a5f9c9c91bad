// GeoJSON mapping and scales for the Level-2 period overview map
use crate::domain::freqmode::MOLOUR_SCALE;
use crate::domain::plot_data::PlotDataError;
use serde::Serialize;
use serde_json::{Map, Value, json};

const RADIUS_RANGE: (f64, f64) = (1.0, 4.0);

/// Turn Level-2 area results into a GeoJSON FeatureCollection.
///
/// `Latitude`/`Longitude` move into a Point geometry; every other field is kept
/// as a feature property.
pub fn to_feature_collection(results: &[Map<String, Value>]) -> Value {
    let features: Vec<Value> = results.iter().map(to_feature).collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

fn to_feature(result: &Map<String, Value>) -> Value {
    let mut properties = result.clone();
    let latitude = properties.remove("Latitude").unwrap_or(Value::Null);
    let longitude = properties.remove("Longitude").unwrap_or(Value::Null);
    json!({
        "type": "Feature",
        "properties": properties,
        "geometry": {
            "type": "Point",
            "coordinates": [longitude, latitude],
        },
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    fn from_values(values: &[f64]) -> Result<Self, PlotDataError> {
        if values.is_empty() {
            return Err(PlotDataError::EmptyInput);
        }
        Ok(Self {
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }

    /// Position of `value` within the extent, 0 at min and 1 at max.
    fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 { 0.0 } else { (value - self.min) / span }
    }
}

/// Marker radius and colour scales for the overview map.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewScale {
    pub parameter: String,
    pub altitude: Extent,
    pub data: Extent,
    pub colour_stops: Vec<(f64, &'static str)>,
}

impl OverviewScale {
    pub fn from_results(results: &[Map<String, Value>], parameter: &str) -> Result<Self, PlotDataError> {
        let altitudes: Vec<f64> = results.iter().filter_map(|r| number(r, "Altitude")).collect();
        let values: Vec<f64> = results.iter().filter_map(|r| number(r, parameter)).collect();

        let altitude = Extent::from_values(&altitudes)?;
        let data = Extent::from_values(&values)?;
        let last = (MOLOUR_SCALE.len() - 1) as f64;
        let colour_stops = MOLOUR_SCALE
            .iter()
            .enumerate()
            .map(|(i, c)| (data.min + i as f64 / last * (data.max - data.min), *c))
            .collect();

        Ok(Self {
            parameter: parameter.to_string(),
            altitude,
            data,
            colour_stops,
        })
    }

    pub fn radius(&self, altitude: f64) -> f64 {
        let (lo, hi) = RADIUS_RANGE;
        lo + self.altitude.fraction(altitude) * (hi - lo)
    }

    /// Colour for `value`, interpolated in RGB between the neighbouring stops.
    pub fn colour(&self, value: f64) -> String {
        let t = self.data.fraction(value).clamp(0.0, 1.0) * (MOLOUR_SCALE.len() - 1) as f64;
        let i = (t.floor() as usize).min(MOLOUR_SCALE.len() - 2);
        let local = t - i as f64;

        match (parse_hex(MOLOUR_SCALE[i]), parse_hex(MOLOUR_SCALE[i + 1])) {
            (Some(a), Some(b)) => {
                let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * local).round() as u8;
                format!("#{:02x}{:02x}{:02x}", mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]))
            }
            _ => MOLOUR_SCALE[i].to_string(),
        }
    }

    /// Set `radius` (from `Altitude`) and `colour` (from the scaled parameter)
    /// on every feature of `collection` that carries those properties.
    pub fn style_features(&self, collection: &mut Value) {
        let Some(features) = collection.get_mut("features").and_then(Value::as_array_mut) else {
            return;
        };
        for feature in features {
            let Some(properties) = feature.get_mut("properties").and_then(Value::as_object_mut) else {
                continue;
            };
            if let Some(altitude) = number(properties, "Altitude") {
                properties.insert("radius".to_string(), json!(self.radius(altitude)));
            }
            if let Some(value) = number(properties, &self.parameter) {
                properties.insert("colour".to_string(), json!(self.colour(value)));
            }
        }
    }
}

/// Heading shown above the overview map.
pub fn overview_info_text(product: &str, start: &str, end: &str, min_altitude_m: f64, max_altitude_m: f64) -> String {
    format!(
        "{} for {} to {}, {} km - {} km",
        product,
        start,
        end,
        min_altitude_m / 1000.0,
        max_altitude_m / 1000.0
    )
}

fn number(result: &Map<String, Value>, key: &str) -> Option<f64> {
    match result.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn parse_hex(colour: &str) -> Option<[u8; 3]> {
    let hex = colour.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

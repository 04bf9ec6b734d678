use crate::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_MAX_TRAVEL_KM: f64 = 50.0;

/// Location fields of one party, borrowed from the surrounding record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationRef<'a> {
    pub coordinates: Option<GeoPoint>,
    pub city: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct ProximityEvaluation {
    pub score: f64,
    pub distance_km: Option<f64>,
    pub details: String,
}

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

fn distance_score(km: f64, max_travel_km: f64) -> f64 {
    if km <= 5.0 {
        1.0
    } else if km <= 10.0 {
        0.8
    } else if km <= 25.0 {
        0.6
    } else if km <= max_travel_km {
        0.4
    } else {
        0.2
    }
}

fn text_fallback(a: Option<&str>, b: Option<&str>) -> (f64, String) {
    let (Some(a), Some(b)) = (nonempty(a), nonempty(b)) else {
        return (0.3, "location unknown on at least one side".into());
    };

    let a_folded = a.trim().to_lowercase();
    let b_folded = b.trim().to_lowercase();

    if a_folded == b_folded {
        (1.0, format!("city match: {a_folded}"))
    } else if a_folded.contains(&b_folded) || b_folded.contains(&a_folded) {
        (0.7, format!("city overlap: {a_folded} ~ {b_folded}"))
    } else {
        (0.3, format!("city mismatch: {a_folded} vs {b_folded}"))
    }
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Proximity score in [0,1]. Prefers the coordinate path (symmetric by
/// construction); falls back to free-text city comparison when either side
/// lacks coordinates. Missing data on both sides lands on the neutral-low
/// fallback, never an error.
pub fn evaluate_proximity(
    a: LocationRef<'_>,
    b: LocationRef<'_>,
    max_travel_km: f64,
) -> ProximityEvaluation {
    if let (Some(p), Some(q)) = (a.coordinates, b.coordinates) {
        let km = haversine_km(p, q);
        return ProximityEvaluation {
            score: distance_score(km, max_travel_km),
            distance_km: Some(km),
            details: format!("distance {km:.1} km"),
        };
    }

    let (score, details) = text_fallback(a.city, b.city);
    ProximityEvaluation {
        score,
        distance_km: None,
        details,
    }
}

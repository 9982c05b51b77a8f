//! Distancia de círculo máximo (haversine)
//!
//! Este módulo calcula distancias entre coordenadas geográficas en
//! kilómetros, con radio de esfera configurable.

/// Radio medio de la Tierra en kilómetros (IUGG)
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Distancia haversine entre dos pares `(lat, lon)` en grados, usando el
/// radio medio de la Tierra. Resultado en kilómetros.
pub fn haversine(a: (f64, f64), b: (f64, f64)) -> f64 {
    haversine_with_radius(a, b, EARTH_RADIUS_KM)
}

/// Distancia haversine con radio de esfera explícito.
///
/// El argumento del arcoseno se recorta a `[0, 1]` para que dos puntos
/// idénticos devuelvan exactamente 0.0 en lugar de NaN por error de
/// redondeo.
pub fn haversine_with_radius(a: (f64, f64), b: (f64, f64), radius: f64) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * radius * h.sqrt().clamp(0.0, 1.0).asin()
}

/// Distancias consecutivas de una secuencia de puntos: el elemento `i` del
/// resultado es la distancia entre el punto `i` y el punto `i + 1`.
///
/// El primer punto no tiene predecesor, así que el resultado tiene
/// `n - 1` elementos (vacío para secuencias de 0 o 1 puntos).
pub fn consecutive_distances(points: &[(f64, f64)]) -> Vec<f64> {
    points
        .windows(2)
        .map(|pair| haversine(pair[0], pair[1]))
        .collect()
}

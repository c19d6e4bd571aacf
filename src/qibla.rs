/// Latitude of the Kaaba in degrees.
pub const KAABA_LATITUDE: f64 = 21.422487;
/// Longitude of the Kaaba in degrees.
pub const KAABA_LONGITUDE: f64 = 39.826206;

/// Initial great-circle bearing from the given position toward the Kaaba, in
/// degrees clockwise from true north, within `[0, 360)`.
pub fn qibla_bearing(latitude: f64, longitude: f64) -> f64 {
    let phi_k = KAABA_LATITUDE.to_radians();
    let phi = latitude.to_radians();
    let delta_lambda = (KAABA_LONGITUDE - longitude).to_radians();

    let y = delta_lambda.sin();
    let x = phi.cos() * phi_k.tan() - phi.sin() * delta_lambda.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Wrap an angle into `[0, 360)`. `rem_euclid` rounds tiny negatives up to 360.
fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

//! Pegel-Messung fuer UI-Meter und Sprecherwechsel

/// Berechnet den RMS-Pegel eines Sample-Buffers
///
/// Ein leerer Buffer liefert 0.0 (nicht NaN), damit das UI-Meter
/// nie einen ungueltigen Wert anzeigt.
pub fn rms_volume(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

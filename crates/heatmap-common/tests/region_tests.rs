//! Tests for Region containment, clamping and extension.

use heatmap_common::region::Region;

// ============================================================================
// Containment
// ============================================================================

#[test]
fn test_contains_is_inclusive() {
    let region = Region::new(20.0, 30.0, 150.0, 160.0);
    assert!(region.contains(20.0, 150.0));
    assert!(region.contains(30.0, 160.0));
    assert!(region.contains(25.0, 155.0));
    assert!(!region.contains(19.999, 155.0));
    assert!(!region.contains(25.0, 160.001));
}

#[test]
fn test_contains_uses_raw_bounds() {
    // A wrapping request contains shifted longitudes, not their originals
    let region = Region::new(-30.0, 30.0, -225.0, -160.0);
    assert!(region.contains(0.0, -200.0));
    assert!(!region.contains(0.0, 160.0));
}

// ============================================================================
// Clamping
// ============================================================================

#[test]
fn test_clamped_bounds() {
    let region = Region::new(-120.0, 95.0, -225.0, 200.0);
    assert_eq!(region.clamped_lat(), (-90.0, 90.0));
    assert_eq!(region.clamped_lon(), (-180.0, 180.0));

    let region = Region::new(-10.0, 10.0, -20.0, 20.0);
    assert_eq!(region.clamped_lat(), (-10.0, 10.0));
    assert_eq!(region.clamped_lon(), (-20.0, 20.0));
}

// ============================================================================
// Extension
// ============================================================================

#[test]
fn test_extended_by_full_span() {
    let region = Region::new(0.0, 10.0, 0.0, 20.0);
    let extended = region.extended(1.0, 1.0);
    assert_eq!(extended, Region::new(-10.0, 20.0, -20.0, 40.0));
    assert_eq!(extended.lat_span(), 3.0 * region.lat_span());
    assert_eq!(extended.lon_span(), 3.0 * region.lon_span());
}

#[test]
fn test_extended_tile_at_antimeridian_wraps() {
    let region = Region::new(0.0, 45.0, 135.0, 180.0);
    let extended = region.extended(1.0, 1.0);
    assert_eq!(extended.max_lon, 225.0);
    assert_eq!(extended.wrap_after(), 45.0);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_is_valid() {
    assert!(Region::world().is_valid());
    assert!(Region::new(0.0, 0.0, 5.0, 5.0).is_valid());
    assert!(!Region::new(10.0, 0.0, 0.0, 5.0).is_valid());
    assert!(!Region::new(0.0, f64::NAN, 0.0, 5.0).is_valid());
}

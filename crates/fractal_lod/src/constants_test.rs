use super::*;

#[test]
fn test_default_texture_size_is_power_of_two() {
  assert!(DEFAULT_TEXTURE_SIZE.is_power_of_two());
}

/// The first sample must sit inside the unit sphere for a bake centered on
/// the origin, otherwise the boolean-hit check could never fire there.
#[test]
fn test_initial_offset_inside_unit_sphere() {
  assert!(INITIAL_RAY_OFFSET * INITIAL_RAY_OFFSET < UNIT_SPHERE_RADIUS_SQ);
  assert!(INITIAL_RAY_OFFSET > 0.0);
}

#[test]
fn test_placeholder_is_far_outside() {
  assert!(PLACEHOLDER_CENTER.length() > 100.0);
}

#[test]
fn test_inside_color_is_not_black() {
  // Black texels are discarded by the fragment stage.
  assert_ne!(INSIDE_COLOR, [0, 0, 0]);
}

use super::*;

// =========================================================================
// Registry
// =========================================================================

#[test]
fn test_registry_lookup() {
  assert_eq!(FractalFormula::by_name("mandelbulb"), Some(FractalFormula::MANDELBULB));
  assert_eq!(FractalFormula::by_name("mandelbox"), Some(FractalFormula::MANDELBOX));
  assert_eq!(FractalFormula::by_name("sphere"), None);
  assert_eq!(FractalFormula::by_name("Mandelbulb"), None);
}

#[test]
fn test_names_round_trip_through_from_str() {
  for (name, formula) in FractalFormula::registry() {
    assert_eq!(formula.name(), name);
    assert_eq!(name.parse::<FractalFormula>(), Ok(formula));
    assert_eq!(formula.to_string(), name);
  }
}

#[test]
fn test_unknown_name_is_an_error() {
  assert_eq!(
    "unknownformula".parse::<FractalFormula>(),
    Err(FormulaError::Unknown("unknownformula".to_string()))
  );
}

// =========================================================================
// Membership
// =========================================================================

/// Points near the origin barely move under z^8 + c and stay bounded.
#[test]
fn test_mandelbulb_contains_point_near_origin() {
  assert!(FractalFormula::MANDELBULB.contains(DVec3::splat(0.1)));
}

/// Anything beyond the unit sphere escapes on the first iteration.
#[test]
fn test_mandelbulb_outside_unit_sphere() {
  let f = FractalFormula::MANDELBULB;
  assert!(!f.contains(DVec3::new(0.9, 0.9, 0.0)));
  assert!(!f.contains(DVec3::new(0.0, 0.0, 1.01)));
  assert!(!f.contains(DVec3::new(-2.5, 0.0, 0.0)));
}

#[test]
fn test_mandelbox_contains_origin() {
  assert!(FractalFormula::MANDELBOX.contains(DVec3::ZERO));
}

/// Far corners double every iteration and escape.
#[test]
fn test_mandelbox_far_corner_escapes() {
  assert!(!FractalFormula::MANDELBOX.contains(DVec3::splat(0.9)));
}

#[test]
fn test_sphere_membership() {
  let f = FractalFormula::Sphere { radius: 0.5 };
  assert!(f.contains(DVec3::new(0.0, 0.0, 0.5)));
  assert!(f.contains(DVec3::new(0.1, -0.2, 0.3)));
  assert!(!f.contains(DVec3::new(0.0, 0.51, 0.0)));
}

#[test]
fn test_only_named_formulas_are_registered() {
  assert!(FractalFormula::MANDELBULB.is_registered());
  assert!(FractalFormula::MANDELBOX.is_registered());
  assert!(!FractalFormula::Sphere { radius: 0.5 }.is_registered());
}

#[test]
fn test_predicates_are_pure() {
  let p = DVec3::new(0.31, -0.12, 0.27);
  for (_, f) in FractalFormula::registry() {
    let first = f.contains(p);
    assert!((0..5).all(|_| f.contains(p) == first));
  }
}

#[test]
fn test_closures_are_memberships() {
  let half_space = |p: DVec3| p.x > 0.0;
  assert!(half_space.contains(DVec3::X));
  assert!(!half_space.contains(-DVec3::X));
}

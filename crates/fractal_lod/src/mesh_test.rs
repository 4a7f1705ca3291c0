use super::*;

const EPS: f64 = 1e-9;

// =========================================================================
// Geometry
// =========================================================================

#[test]
fn test_vertices_are_unit_length() {
  for v in VERTICES {
    assert!((v.length() - 1.0).abs() < EPS, "{v:?}");
  }
}

/// Every face is equilateral with the same edge length.
#[test]
fn test_faces_are_regular() {
  let [a, b, _] = triangle_vertices(0);
  let edge = a.distance(b);
  for nr in 0..TRIANGLE_COUNT {
    let [p, q, r] = triangle_vertices(nr);
    for len in [p.distance(q), q.distance(r), r.distance(p)] {
      assert!((len - edge).abs() < 1e-6, "triangle {nr}");
    }
  }
}

/// Faces are wound consistently: their normals point away from the center.
#[test]
fn test_faces_point_outward() {
  for nr in 0..TRIANGLE_COUNT {
    let [a, b, c] = triangle_vertices(nr);
    let centroid = (a + b + c) / 3.0;
    let normal = (b - a).cross(c - a);
    assert!(normal.dot(centroid) > 0.1, "triangle {nr}");
  }
}

// =========================================================================
// Texture layout
// =========================================================================

#[test]
fn test_texture_pos_corners() {
  for nr in [0, 7, 19] {
    let [apex, left, right] = triangle_vertices(nr);
    assert!(triangle_texture_pos(nr, 0.5, 1.0).distance(apex) < EPS);
    assert!(triangle_texture_pos(nr, 0.0, 0.0).distance(left) < EPS);
    assert!(triangle_texture_pos(nr, 1.0, 0.0).distance(right) < EPS);
  }
}

#[test]
fn test_texture_pos_interior() {
  let [apex, left, right] = triangle_vertices(3);
  let mid_base = (left + right) * 0.5;
  let expected = mid_base.lerp(apex, 0.5);
  assert!(triangle_texture_pos(3, 0.5, 0.5).distance(expected) < EPS);
}

/// Points of the valid region stay on the face plane.
#[test]
fn test_texture_pos_stays_on_face() {
  let [a, b, c] = triangle_vertices(11);
  let normal = (b - a).cross(c - a).normalize();
  for (u, v) in [(0.3, 0.2), (0.5, 0.9), (0.6, 0.4), (0.2, 0.05)] {
    let p = triangle_texture_pos(11, u, v);
    assert!((p - a).dot(normal).abs() < EPS, "({u}, {v})");
  }
}

// =========================================================================
// Frustum
// =========================================================================

#[test]
fn test_point_visibility() {
  let f = Frustum::new(1.0);
  assert!(f.contains(DVec3::new(0.0, 0.0, 1.0)));
  assert!(f.contains(DVec3::new(0.9, -0.9, 1.0)));
  assert!(!f.contains(DVec3::new(0.0, 0.0, -1.0)), "behind the camera");
  assert!(!f.contains(DVec3::new(0.0, 0.0, 0.0)));
  assert!(!f.contains(DVec3::new(0.0, 1.5, 1.0)), "above the view");
}

/// A wide viewport (small height/width) sees further to the sides.
#[test]
fn test_aspect_ratio_widens_view() {
  let p = DVec3::new(1.5, 0.0, 1.0);
  assert!(!Frustum::new(1.0).contains(p));
  assert!(Frustum::from_viewport(1920, 960).contains(p));
}

#[test]
fn test_degenerate_viewport_is_square() {
  assert_eq!(Frustum::from_viewport(0, 100), Frustum::default());
}

#[test]
fn test_triangle_visibility_counts() {
  let f = Frustum::new(1.0);
  let id = DMat3::IDENTITY;
  // Triangle 0 has vertex 5 = (0, s, t) straight ahead.
  assert!(f.triangle_visible(0, DVec3::ZERO, &id) >= 1);
  // Triangle 12 lies entirely at z <= 0.
  assert_eq!(f.triangle_visible(12, DVec3::ZERO, &id), 0);
  // Pushing everything behind the camera hides all faces.
  let behind = DVec3::new(0.0, 0.0, -5.0);
  assert!((0..TRIANGLE_COUNT).all(|nr| f.triangle_visible(nr, behind, &id) == 0));
}

/// Turning around swaps which faces are visible.
#[test]
fn test_rotation_changes_visibility() {
  let f = Frustum::new(1.0);
  let turn = DMat3::from_rotation_y(std::f64::consts::PI);
  assert_eq!(f.triangle_visible(12, DVec3::ZERO, &DMat3::IDENTITY), 0);
  assert!(f.triangle_visible(12, DVec3::ZERO, &turn) > 0);
}

// =========================================================================
// GPU buffers
// =========================================================================

#[test]
fn test_buffer_layout() {
  let positions = vertex_positions();
  let uvs = texture_coords();
  assert_eq!(positions.len(), TRIANGLE_COUNT * 3 * 3);
  assert_eq!(uvs.len(), TRIANGLE_COUNT * 3 * 2);
  assert_eq!(&uvs[0..6], &[0.5, 0.0, 0.0, 1.0, 1.0, 1.0]);
  let apex = VERTICES[TRIANGLES[1][0]];
  assert_eq!(positions[9], apex.x as f32);
}

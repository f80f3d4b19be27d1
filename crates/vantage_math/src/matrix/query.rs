//! Read-only queries: transforming points and vectors, extracting frustum
//! geometry and decomposing transforms.

use super::{Matrix4, kernels::AffineInverse};
use crate::{
    convention::DepthRange,
    frustum::{FrustumCorner, FrustumPlane},
    properties::MatrixProperties,
};
use nalgebra::{Matrix3, Point3, Rotation3, UnitQuaternion, UnitVector3, Vector3, Vector4};
use std::f64::consts::PI;

/// A rectangular region of the window that normalized device coordinates
/// are mapped to, together with the depth range of the projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub depth_range: DepthRange,
}

/// The parallelepiped that an affine transform maps onto the cube
/// `[-1, 1]^3`, given as one corner and the three edges leaving it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineSpan {
    pub corner: Point3<f64>,
    pub x_span: Vector3<f64>,
    pub y_span: Vector3<f64>,
    pub z_span: Vector3<f64>,
}

impl Viewport {
    /// Creates a viewport for a projection with depth in `[-1, 1]`.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            depth_range: DepthRange::NegativeOneToOne,
        }
    }

    /// Returns the viewport with the given depth range of the projection.
    pub fn with_depth_range(mut self, depth_range: DepthRange) -> Self {
        self.depth_range = depth_range;
        self
    }
}

/// Finds the point where three planes `(a, b, c, d)` meet.
fn intersection_of_planes(
    plane_1: &Vector4<f64>,
    plane_2: &Vector4<f64>,
    plane_3: &Vector4<f64>,
) -> Point3<f64> {
    let (n1, n2, n3) = (plane_1.xyz(), plane_2.xyz(), plane_3.xyz());
    let n2_cross_n3 = n2.cross(&n3);
    let n3_cross_n1 = n3.cross(&n1);
    let n1_cross_n2 = n1.cross(&n2);
    let inv_denominator = 1.0 / n1.dot(&n2_cross_n3);
    Point3::from(
        -(n2_cross_n3 * plane_1.w + n3_cross_n1 * plane_2.w + n1_cross_n2 * plane_3.w)
            * inv_denominator,
    )
}

fn signed_distance(plane: &Vector4<f64>, point: &Point3<f64>) -> f64 {
    plane.xyz().dot(&point.coords) + plane.w
}

impl Matrix4 {
    /// Computes `self * vector`.
    pub fn transform(&self, vector: &Vector4<f64>) -> Vector4<f64> {
        let m = &self.elements;
        Vector4::from_fn(|row, _| {
            m[row] * vector.x + m[4 + row] * vector.y + m[8 + row] * vector.z + m[12 + row] * vector.w
        })
    }

    /// Computes `self * vector` assuming the matrix is affine, so that the
    /// w-component passes through unchanged.
    pub fn transform_affine(&self, vector: &Vector4<f64>) -> Vector4<f64> {
        let m = &self.elements;
        Vector4::from_fn(|row, _| {
            if row == 3 {
                vector.w
            } else {
                m[row] * vector.x
                    + m[4 + row] * vector.y
                    + m[8 + row] * vector.z
                    + m[12 + row] * vector.w
            }
        })
    }

    /// Transforms the point assuming the matrix is affine, ignoring the
    /// last row.
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let m = &self.elements;
        Point3::from(Vector3::from_fn(|row, _| {
            m[row] * point.x + m[4 + row] * point.y + m[8 + row] * point.z + m[12 + row]
        }))
    }

    /// Transforms the point and divides by the resulting w-component.
    pub fn project_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let clip = self.transform(&point.to_homogeneous());
        Point3::from(clip.xyz() / clip.w)
    }

    /// Transforms the direction by the upper-left 3x3 block, ignoring
    /// translation.
    pub fn transform_vector(&self, direction: &Vector3<f64>) -> Vector3<f64> {
        let m = &self.elements;
        Vector3::from_fn(|row, _| {
            m[row] * direction.x + m[4 + row] * direction.y + m[8 + row] * direction.z
        })
    }

    /// Computes the axis-aligned box enclosing the image of the box with the
    /// given corners, assuming the matrix is affine.
    pub fn transform_aab(
        &self,
        min: &Point3<f64>,
        max: &Point3<f64>,
    ) -> (Point3<f64>, Point3<f64>) {
        let translation = self.translation_vector();
        let mut new_min = translation;
        let mut new_max = translation;
        for column in 0..3 {
            for row in 0..3 {
                let scale = self.elements[column * 4 + row];
                let a = scale * min[column];
                let b = scale * max[column];
                new_min[row] += a.min(b);
                new_max[row] += a.max(b);
            }
        }
        (Point3::from(new_min), Point3::from(new_max))
    }

    /// Maps the point to window coordinates: x and y within the viewport and
    /// depth within `[0, 1]`.
    pub fn project(&self, point: &Point3<f64>, viewport: &Viewport) -> Vector3<f64> {
        let ndc = self.project_point(point);
        let depth = match viewport.depth_range {
            DepthRange::NegativeOneToOne => (ndc.z + 1.0) * 0.5,
            DepthRange::ZeroToOne => ndc.z,
        };
        Vector3::new(
            (ndc.x * 0.5 + 0.5) * viewport.width + viewport.x,
            (ndc.y * 0.5 + 0.5) * viewport.height + viewport.y,
            depth,
        )
    }

    /// Maps window coordinates back to the point that projects onto them.
    pub fn unproject(&self, window: &Vector3<f64>, viewport: &Viewport) -> Point3<f64> {
        self.inverted().unproject_inverted(window, viewport)
    }

    /// Like [`Self::unproject`], but with `self` already being the inverse
    /// of the projection.
    pub fn unproject_inverted(&self, window: &Vector3<f64>, viewport: &Viewport) -> Point3<f64> {
        let ndc_z = match viewport.depth_range {
            DepthRange::NegativeOneToOne => window.z + window.z - 1.0,
            DepthRange::ZeroToOne => window.z,
        };
        let ndc = Point3::new(
            (window.x - viewport.x) / viewport.width * 2.0 - 1.0,
            (window.y - viewport.y) / viewport.height * 2.0 - 1.0,
            ndc_z,
        );
        self.project_point(&ndc)
    }

    /// Computes the ray through the given window position, starting on the
    /// near plane and with a unit direction towards the far plane.
    pub fn unproject_ray(
        &self,
        window_x: f64,
        window_y: f64,
        viewport: &Viewport,
    ) -> (Point3<f64>, Vector3<f64>) {
        let inverse = self.inverted();
        let near = inverse.unproject_inverted(&Vector3::new(window_x, window_y, 0.0), viewport);
        let far = inverse.unproject_inverted(&Vector3::new(window_x, window_y, 1.0), viewport);
        (near, (far - near).normalize())
    }

    /// Computes the given clipping plane of the frustum this matrix projects
    /// onto the clip volume with depth in `[-1, 1]`, as a normalized
    /// `(a, b, c, d)` with the normal pointing into the frustum.
    #[inline]
    pub fn frustum_plane(&self, plane: FrustumPlane) -> Vector4<f64> {
        self.frustum_plane_in(plane, DepthRange::NegativeOneToOne)
    }

    /// Like [`Self::frustum_plane`], for a clip volume with the given depth
    /// range.
    pub fn frustum_plane_in(&self, plane: FrustumPlane, depth_range: DepthRange) -> Vector4<f64> {
        let plane = self.unnormalized_frustum_plane(plane, depth_range);
        plane / plane.xyz().norm()
    }

    /// Computes all six clipping planes, in the order of
    /// [`FrustumPlane::ALL`].
    pub fn frustum_planes_in(&self, depth_range: DepthRange) -> [Vector4<f64>; 6] {
        FrustumPlane::ALL.map(|plane| self.frustum_plane_in(plane, depth_range))
    }

    fn unnormalized_frustum_plane(
        &self,
        plane: FrustumPlane,
        depth_range: DepthRange,
    ) -> Vector4<f64> {
        let w = self.row(3);
        match plane {
            FrustumPlane::NegativeX => w + self.row(0),
            FrustumPlane::PositiveX => w - self.row(0),
            FrustumPlane::NegativeY => w + self.row(1),
            FrustumPlane::PositiveY => w - self.row(1),
            FrustumPlane::NegativeZ => match depth_range {
                DepthRange::NegativeOneToOne => w + self.row(2),
                DepthRange::ZeroToOne => self.row(2),
            },
            FrustumPlane::PositiveZ => w - self.row(2),
        }
    }

    /// Computes the given corner of the frustum as the meeting point of its
    /// three planes. Nearly parallel planes give non-finite coordinates.
    #[inline]
    pub fn frustum_corner(&self, corner: FrustumCorner) -> Point3<f64> {
        self.frustum_corner_in(corner, DepthRange::NegativeOneToOne)
    }

    pub fn frustum_corner_in(&self, corner: FrustumCorner, depth_range: DepthRange) -> Point3<f64> {
        let [x, y, z] = corner
            .planes()
            .map(|plane| self.unnormalized_frustum_plane(plane, depth_range));
        intersection_of_planes(&x, &y, &z)
    }

    /// Computes all eight corners, in the order of [`FrustumCorner::ALL`].
    #[inline]
    pub fn frustum_corners(&self) -> [Point3<f64>; 8] {
        self.frustum_corners_in(DepthRange::NegativeOneToOne)
    }

    pub fn frustum_corners_in(&self, depth_range: DepthRange) -> [Point3<f64>; 8] {
        FrustumCorner::ALL.map(|corner| self.frustum_corner_in(corner, depth_range))
    }

    /// Computes the axis-aligned box enclosing the frustum, as its minimum
    /// and maximum corners.
    #[inline]
    pub fn frustum_aabb(&self) -> (Point3<f64>, Point3<f64>) {
        self.frustum_aabb_in(DepthRange::NegativeOneToOne)
    }

    pub fn frustum_aabb_in(&self, depth_range: DepthRange) -> (Point3<f64>, Point3<f64>) {
        let corners = self.frustum_corners_in(depth_range);
        let mut min = corners[0];
        let mut max = corners[0];
        for corner in &corners[1..] {
            min = min.inf(corner);
            max = max.sup(corner);
        }
        (min, max)
    }

    /// Computes the unit direction of the ray through the frustum at the
    /// given normalized position, where `(0, 0)` is the bottom left and
    /// `(1, 1)` the top right edge.
    #[inline]
    pub fn frustum_ray_direction(&self, x: f64, y: f64) -> Vector3<f64> {
        self.frustum_ray_direction_in(x, y, DepthRange::NegativeOneToOne)
    }

    pub fn frustum_ray_direction_in(&self, x: f64, y: f64, depth_range: DepthRange) -> Vector3<f64> {
        let [nxnynz, pxnynz, pxpynz, nxpynz, pxnypz, nxnypz, nxpypz, pxpypz] =
            self.frustum_corners_in(depth_range).map(|corner| corner.coords);

        let bilerp = |bottom_left: Vector3<f64>,
                      bottom_right: Vector3<f64>,
                      top_left: Vector3<f64>,
                      top_right: Vector3<f64>| {
            let bottom = bottom_left.lerp(&bottom_right, x);
            let top = top_left.lerp(&top_right, x);
            bottom.lerp(&top, y)
        };

        let near = bilerp(nxnynz, pxnynz, nxpynz, pxpynz);
        let far = bilerp(nxnypz, pxnypz, nxpypz, pxpypz);
        (far - near).normalize()
    }

    /// Computes the apex of a perspective frustum, which for a
    /// view-projection matrix is the camera position.
    pub fn perspective_origin(&self) -> Point3<f64> {
        let depth_range = DepthRange::NegativeOneToOne;
        intersection_of_planes(
            &self.unnormalized_frustum_plane(FrustumPlane::NegativeX, depth_range),
            &self.unnormalized_frustum_plane(FrustumPlane::PositiveX, depth_range),
            &self.unnormalized_frustum_plane(FrustumPlane::PositiveY, depth_range),
        )
    }

    /// Computes the vertical field of view of a perspective frustum in
    /// radians, from the angle between its bottom and top planes.
    pub fn perspective_fov(&self) -> f64 {
        let bottom = self.frustum_plane(FrustumPlane::NegativeY).xyz();
        let top = self.frustum_plane(FrustumPlane::PositiveY).xyz();
        PI - bottom.dot(&top).clamp(-1.0, 1.0).acos()
    }

    /// Computes the distance from the apex of a perspective frustum to its
    /// near plane.
    #[inline]
    pub fn perspective_near(&self) -> f64 {
        self.perspective_near_in(DepthRange::NegativeOneToOne)
    }

    pub fn perspective_near_in(&self, depth_range: DepthRange) -> f64 {
        let near = self.frustum_plane_in(FrustumPlane::NegativeZ, depth_range);
        -signed_distance(&near, &self.perspective_origin())
    }

    /// Computes the distance from the apex of a perspective frustum to its
    /// far plane. The far plane is the same for both depth ranges.
    pub fn perspective_far(&self) -> f64 {
        let far = self.frustum_plane(FrustumPlane::PositiveZ);
        signed_distance(&far, &self.perspective_origin())
    }

    /// Whether the point lies inside the frustum.
    #[inline]
    pub fn test_point(&self, point: &Point3<f64>) -> bool {
        self.test_point_in(point, DepthRange::NegativeOneToOne)
    }

    pub fn test_point_in(&self, point: &Point3<f64>, depth_range: DepthRange) -> bool {
        self.frustum_planes_in(depth_range)
            .iter()
            .all(|plane| signed_distance(plane, point) >= 0.0)
    }

    /// Whether the sphere could intersect the frustum. Spheres near the
    /// frustum's edges may pass even when they lie outside.
    #[inline]
    pub fn test_sphere(&self, center: &Point3<f64>, radius: f64) -> bool {
        self.test_sphere_in(center, radius, DepthRange::NegativeOneToOne)
    }

    pub fn test_sphere_in(&self, center: &Point3<f64>, radius: f64, depth_range: DepthRange) -> bool {
        self.frustum_planes_in(depth_range)
            .iter()
            .all(|plane| signed_distance(plane, center) >= -radius)
    }

    /// Whether the axis-aligned box could intersect the frustum. Boxes near
    /// the frustum's edges may pass even when they lie outside.
    #[inline]
    pub fn test_aab(&self, min: &Point3<f64>, max: &Point3<f64>) -> bool {
        self.test_aab_in(min, max, DepthRange::NegativeOneToOne)
    }

    pub fn test_aab_in(&self, min: &Point3<f64>, max: &Point3<f64>, depth_range: DepthRange) -> bool {
        self.frustum_planes_in(depth_range).iter().all(|plane| {
            // Corner furthest along the normal
            let corner = Point3::new(
                if plane.x < 0.0 { min.x } else { max.x },
                if plane.y < 0.0 { min.y } else { max.y },
                if plane.z < 0.0 { min.z } else { max.z },
            );
            signed_distance(plane, &corner) >= 0.0
        })
    }

    /// The point that this transform maps to the origin.
    pub fn origin(&self) -> Point3<f64> {
        if self.properties.contains(MatrixProperties::AFFINE) {
            return self.origin_affine();
        }
        let column = self.inverted().column(3);
        Point3::from(column.xyz() / column.w)
    }

    /// The point that this transform maps to the origin, assuming the matrix
    /// is affine.
    pub fn origin_affine(&self) -> Point3<f64> {
        Point3::from(AffineInverse::of(&self.elements).translation)
    }

    /// Computes the parallelepiped that this affine transform maps onto the
    /// cube `[-1, 1]^3`.
    pub fn affine_span(&self) -> AffineSpan {
        let inverse = AffineInverse::of(&self.elements);
        let corner = inverse.transform_point([-1.0, -1.0, -1.0]);
        let span = |column: usize| {
            Vector3::from_column_slice(&inverse.linear[column * 3..column * 3 + 3]) * 2.0
        };
        AffineSpan {
            corner: Point3::from(corner),
            x_span: span(0),
            y_span: span(1),
            z_span: span(2),
        }
    }

    /// The direction that this transform maps onto the positive x-axis.
    pub fn positive_x(&self) -> Vector3<f64> {
        self.positive_axis(0)
    }

    /// The direction that this transform maps onto the positive y-axis.
    pub fn positive_y(&self) -> Vector3<f64> {
        self.positive_axis(1)
    }

    /// The direction that this transform maps onto the positive z-axis.
    pub fn positive_z(&self) -> Vector3<f64> {
        self.positive_axis(2)
    }

    fn positive_axis(&self, axis: usize) -> Vector3<f64> {
        let inverse = AffineInverse::of(&self.elements);
        Vector3::from_column_slice(&inverse.linear[axis * 3..axis * 3 + 3]).normalize()
    }

    /// Like [`Self::positive_x`], assuming the upper-left 3x3 block is
    /// orthonormal.
    pub fn normalized_positive_x(&self) -> Vector3<f64> {
        self.row(0).xyz()
    }

    /// Like [`Self::positive_y`], assuming the upper-left 3x3 block is
    /// orthonormal.
    pub fn normalized_positive_y(&self) -> Vector3<f64> {
        self.row(1).xyz()
    }

    /// Like [`Self::positive_z`], assuming the upper-left 3x3 block is
    /// orthonormal.
    pub fn normalized_positive_z(&self) -> Vector3<f64> {
        self.row(2).xyz()
    }

    /// The lengths of the first three columns of the upper-left 3x3 block.
    pub fn scale_factors(&self) -> Vector3<f64> {
        Vector3::from_fn(|column, _| self.column(column).xyz().norm())
    }

    /// Decomposes the rotation `Rx * Ry * Rz` into its angles `(x, y, z)`.
    pub fn euler_angles_xyz(&self) -> Vector3<f64> {
        let (m00, m10, m20, m21, m22) = (
            self.m00(),
            self.m10(),
            self.m20(),
            self.m21(),
            self.m22(),
        );
        Vector3::new(
            (-m21).atan2(m22),
            m20.atan2((1.0 - m20 * m20).max(0.0).sqrt()),
            (-m10).atan2(m00),
        )
    }

    /// Decomposes the rotation `Rz * Ry * Rx` into its angles `(x, y, z)`.
    pub fn euler_angles_zyx(&self) -> Vector3<f64> {
        let (m00, m01, m02, m12, m22) = (
            self.m00(),
            self.m01(),
            self.m02(),
            self.m12(),
            self.m22(),
        );
        Vector3::new(
            m12.atan2(m22),
            (-m02).atan2((1.0 - m02 * m02).max(0.0).sqrt()),
            m01.atan2(m00),
        )
    }

    /// Decomposes the rotation `Ry * Rx * Rz` into its angles `(x, y, z)`.
    pub fn euler_angles_yxz(&self) -> Vector3<f64> {
        let (m01, m11, m20, m21, m22) = (
            self.m01(),
            self.m11(),
            self.m20(),
            self.m21(),
            self.m22(),
        );
        Vector3::new(
            (-m21).atan2((1.0 - m21 * m21).max(0.0).sqrt()),
            m20.atan2(m22),
            m01.atan2(m11),
        )
    }

    /// The upper-left 3x3 block with each column scaled to unit length.
    pub fn normalized_rotation(&self) -> Matrix3<f64> {
        let scale = self.scale_factors();
        Matrix3::from_fn(|row, column| self.elements[column * 4 + row] / scale[column])
    }

    /// The rotation of the upper-left 3x3 block after removing its scaling.
    pub fn to_quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(
            self.normalized_rotation(),
        ))
    }

    /// The rotation of the upper-left 3x3 block as an axis and an angle, or
    /// [`None`] if the rotation is negligible.
    pub fn axis_angle(&self) -> Option<(UnitVector3<f64>, f64)> {
        self.to_quaternion().axis_angle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClipConvention;
    use approx::assert_abs_diff_eq;

    const EPSILON: f64 = 1e-9;

    fn projection() -> Matrix4 {
        Matrix4::perspective(1.2, 1.5, 0.5, 40.0, ClipConvention::OPENGL)
    }

    #[test]
    fn transforming_vector_matches_nalgebra() {
        let m = Matrix4::rotation_x(0.4).translated(1.0, 2.0, 3.0);
        let vector = Vector4::new(0.5, -1.0, 2.0, 1.0);
        assert_abs_diff_eq!(
            m.transform(&vector),
            m.to_nalgebra() * vector,
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(m.transform_affine(&vector), m * vector, epsilon = EPSILON);
    }

    #[test]
    fn transforming_direction_ignores_translation() {
        let m = Matrix4::translation(5.0, 5.0, 5.0);
        assert_eq!(m.transform_vector(&Vector3::x()), Vector3::x());
    }

    #[test]
    fn transforming_box_encloses_transformed_corners() {
        let m = Matrix4::rotation_z(0.7).scaled(2.0, 1.0, 1.0).translated(1.0, 0.0, 0.0);
        let (min, max) = (Point3::new(-1.0, -2.0, 0.0), Point3::new(1.0, 2.0, 3.0));
        let (new_min, new_max) = m.transform_aab(&min, &max);
        for x in [min.x, max.x] {
            for y in [min.y, max.y] {
                for z in [min.z, max.z] {
                    let image = m.transform_point(&Point3::new(x, y, z));
                    for axis in 0..3 {
                        assert!(image[axis] >= new_min[axis] - EPSILON);
                        assert!(image[axis] <= new_max[axis] + EPSILON);
                    }
                }
            }
        }
    }

    #[test]
    fn projecting_and_unprojecting_gives_original_point() {
        let view_projection = projection()
            .multiplied(&Matrix4::rotation_y(0.3).translated(0.0, -1.0, -5.0));
        let viewport = Viewport::new(10.0, 20.0, 800.0, 600.0);
        let point = Point3::new(0.3, 1.0, -2.0);

        let window = view_projection.project(&point, &viewport);
        let recovered = view_projection.unproject(&window, &viewport);

        assert!(window.z > 0.0 && window.z < 1.0);
        assert_abs_diff_eq!(recovered, point, epsilon = 1e-8);
    }

    #[test]
    fn projecting_with_zero_to_one_depth_keeps_depth() {
        let projection = Matrix4::perspective(1.0, 1.0, 1.0, 10.0, ClipConvention::VULKAN);
        let viewport = Viewport::new(0.0, 0.0, 100.0, 100.0).with_depth_range(DepthRange::ZeroToOne);
        let window = projection.project(&Point3::new(0.0, 0.0, -1.0), &viewport);
        assert_abs_diff_eq!(window, Vector3::new(50.0, 50.0, 0.0), epsilon = EPSILON);

        let recovered = projection.unproject(&window, &viewport);
        assert_abs_diff_eq!(recovered, Point3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn unprojected_ray_through_center_points_along_view_direction() {
        let viewport = Viewport::new(0.0, 0.0, 200.0, 100.0);
        let (origin, direction) = projection().unproject_ray(100.0, 50.0, &viewport);
        assert_abs_diff_eq!(origin, Point3::new(0.0, 0.0, -0.5), epsilon = EPSILON);
        assert_abs_diff_eq!(direction, -Vector3::z(), epsilon = EPSILON);
    }

    #[test]
    fn frustum_planes_of_perspective_point_inwards() {
        let planes = projection().frustum_planes_in(DepthRange::NegativeOneToOne);
        let inside = Point3::new(0.0, 0.0, -10.0);
        for plane in &planes {
            assert_abs_diff_eq!(plane.xyz().norm(), 1.0, epsilon = EPSILON);
            assert!(signed_distance(plane, &inside) > 0.0);
        }
        assert_abs_diff_eq!(
            planes[4],
            Vector4::new(0.0, 0.0, -1.0, -0.5),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            planes[5],
            Vector4::new(0.0, 0.0, 1.0, 40.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn frustum_planes_of_orthographic_bound_box() {
        let projection =
            Matrix4::orthographic(-2.0, 3.0, -1.0, 4.0, 0.5, 20.0, ClipConvention::VULKAN);
        let depth_range = DepthRange::ZeroToOne;
        assert_abs_diff_eq!(
            projection.frustum_plane_in(FrustumPlane::NegativeX, depth_range),
            Vector4::new(1.0, 0.0, 0.0, 2.0),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            projection.frustum_plane_in(FrustumPlane::PositiveY, depth_range),
            Vector4::new(0.0, -1.0, 0.0, 4.0),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            projection.frustum_plane_in(FrustumPlane::NegativeZ, depth_range),
            Vector4::new(0.0, 0.0, -1.0, -0.5),
            epsilon = EPSILON
        );
    }

    #[test]
    fn frustum_corners_of_orthographic_are_box_corners() {
        let projection =
            Matrix4::orthographic(-2.0, 3.0, -1.0, 4.0, 0.5, 20.0, ClipConvention::OPENGL);
        assert_abs_diff_eq!(
            projection.frustum_corner(FrustumCorner::NxNyNz),
            Point3::new(-2.0, -1.0, -0.5),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            projection.frustum_corner(FrustumCorner::PxPyPz),
            Point3::new(3.0, 4.0, -20.0),
            epsilon = EPSILON
        );
        let (min, max) = projection.frustum_aabb();
        assert_abs_diff_eq!(min, Point3::new(-2.0, -1.0, -20.0), epsilon = EPSILON);
        assert_abs_diff_eq!(max, Point3::new(3.0, 4.0, -0.5), epsilon = EPSILON);
    }

    #[test]
    fn frustum_corners_project_to_clip_corners() {
        for convention in [ClipConvention::OPENGL, ClipConvention::VULKAN, ClipConvention::DIRECTX] {
            let projection = Matrix4::perspective(1.0, 1.3, 0.5, 30.0, convention);
            let ndc_near = match convention.depth_range {
                DepthRange::NegativeOneToOne => -1.0,
                DepthRange::ZeroToOne => 0.0,
            };
            let corner = projection.frustum_corner_in(FrustumCorner::PxNyNz, convention.depth_range);
            assert_abs_diff_eq!(
                projection.project_point(&corner),
                Point3::new(1.0, -1.0, ndc_near),
                epsilon = EPSILON
            );
            let corner = projection.frustum_corner_in(FrustumCorner::NxPyPz, convention.depth_range);
            assert_abs_diff_eq!(
                projection.project_point(&corner),
                Point3::new(-1.0, 1.0, 1.0),
                epsilon = 1e-7
            );
        }
    }

    #[test]
    fn perspective_origin_is_camera_position() {
        let eye = Point3::new(1.0, 2.0, 3.0);
        let view = Matrix4::look_at(
            &eye,
            &Point3::origin(),
            &Vector3::y(),
            crate::Handedness::Right,
        );
        let view_projection = projection().multiplied(&view);
        assert_abs_diff_eq!(view_projection.perspective_origin(), eye, epsilon = EPSILON);
    }

    #[test]
    fn perspective_fov_near_and_far_match_construction() {
        let projection = projection();
        assert_abs_diff_eq!(projection.perspective_fov(), 1.2, epsilon = EPSILON);
        assert_abs_diff_eq!(projection.perspective_near(), 0.5, epsilon = EPSILON);
        assert_abs_diff_eq!(projection.perspective_far(), 40.0, epsilon = 1e-7);
    }

    #[test]
    fn perspective_near_works_for_zero_to_one_depth() {
        let projection = Matrix4::perspective(1.0, 1.0, 0.25, 10.0, ClipConvention::DIRECTX);
        assert_abs_diff_eq!(
            projection.perspective_near_in(DepthRange::ZeroToOne),
            0.25,
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(projection.perspective_far(), 10.0, epsilon = 1e-7);
    }

    #[test]
    fn frustum_ray_through_center_points_along_view_direction() {
        let direction = projection().frustum_ray_direction(0.5, 0.5);
        assert_abs_diff_eq!(direction, -Vector3::z(), epsilon = EPSILON);
    }

    #[test]
    fn frustum_ray_through_corner_points_towards_corner() {
        let projection = projection();
        let direction = projection.frustum_ray_direction(1.0, 1.0);
        let corner = projection.frustum_corner(FrustumCorner::PxPyNz);
        assert_abs_diff_eq!(direction, corner.coords.normalize(), epsilon = EPSILON);
    }

    #[test]
    fn frustum_ray_direction_handles_zero_to_one_depth() {
        let projection = Matrix4::perspective(1.0, 1.0, 0.5, 30.0, ClipConvention::VULKAN);
        let direction = projection.frustum_ray_direction_in(0.0, 0.0, DepthRange::ZeroToOne);
        let corner = projection.frustum_corner_in(FrustumCorner::NxNyPz, DepthRange::ZeroToOne);
        assert_abs_diff_eq!(direction, corner.coords.normalize(), epsilon = 1e-7);
    }

    #[test]
    fn point_test_accepts_points_inside_only() {
        let projection = projection();
        assert!(projection.test_point(&Point3::new(0.0, 0.0, -5.0)));
        assert!(!projection.test_point(&Point3::new(0.0, 0.0, 5.0)));
        assert!(!projection.test_point(&Point3::new(0.0, 0.0, -50.0)));
        assert!(!projection.test_point(&Point3::new(100.0, 0.0, -5.0)));
    }

    #[test]
    fn point_test_uses_zero_to_one_near_plane() {
        let projection = Matrix4::perspective(1.0, 1.0, 1.0, 10.0, ClipConvention::VULKAN);
        let point = Point3::new(0.0, 0.0, -1.5);
        assert!(projection.test_point_in(&point, DepthRange::ZeroToOne));
        assert!(!projection.test_point_in(&Point3::new(0.0, 0.0, -0.5), DepthRange::ZeroToOne));
    }

    #[test]
    fn sphere_test_accepts_spheres_overlapping_boundary() {
        let projection = projection();
        let center = Point3::new(0.0, 0.0, -41.0);
        assert!(!projection.test_sphere(&center, 0.5));
        assert!(projection.test_sphere(&center, 2.0));
    }

    #[test]
    fn box_test_rejects_boxes_behind_camera() {
        let projection = projection();
        assert!(!projection.test_aab(&Point3::new(-1.0, -1.0, 1.0), &Point3::new(1.0, 1.0, 2.0)));
        assert!(projection.test_aab(&Point3::new(-1.0, -1.0, -2.0), &Point3::new(1.0, 1.0, 2.0)));
    }

    #[test]
    fn origin_of_affine_transform_maps_to_origin() {
        let m = Matrix4::rotation_x(0.5).scaled(2.0, 3.0, 1.0).translated(1.0, 2.0, 3.0);
        let origin = m.origin();
        assert_abs_diff_eq!(m.transform_point(&origin), Point3::origin(), epsilon = EPSILON);
    }

    #[test]
    fn origin_of_view_projection_maps_to_clip_origin() {
        let view_projection = projection().multiplied(&Matrix4::translation(0.0, 0.0, -3.0));
        let origin = view_projection.origin();
        let clip = view_projection.transform(&origin.to_homogeneous());
        assert_abs_diff_eq!(clip.xyz(), Vector3::zeros(), epsilon = EPSILON);
    }

    #[test]
    fn affine_span_maps_onto_unit_cube() {
        let m = Matrix4::orthographic(-2.0, 3.0, -1.0, 4.0, 0.5, 20.0, ClipConvention::OPENGL);
        let span = m.affine_span();
        let opposite = span.corner + span.x_span + span.y_span + span.z_span;
        assert_abs_diff_eq!(
            m.transform_point(&span.corner),
            Point3::new(-1.0, -1.0, -1.0),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            m.transform_point(&opposite),
            Point3::new(1.0, 1.0, 1.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn positive_axes_of_rotation_match_normalized_variants() {
        let m = Matrix4::rotation_xyz(0.3, -0.2, 1.1);
        assert_abs_diff_eq!(m.positive_x(), m.normalized_positive_x(), epsilon = EPSILON);
        assert_abs_diff_eq!(m.positive_y(), m.normalized_positive_y(), epsilon = EPSILON);
        assert_abs_diff_eq!(m.positive_z(), m.normalized_positive_z(), epsilon = EPSILON);
        assert_abs_diff_eq!(
            m.transform_vector(&m.positive_x()),
            Vector3::x(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn positive_axis_of_scaled_transform_maps_onto_axis() {
        let m = Matrix4::rotation_y(0.6).scaled(1.0, 3.0, 0.5);
        let direction = m.transform_vector(&m.positive_z()).normalize();
        assert_abs_diff_eq!(direction, Vector3::z(), epsilon = EPSILON);
    }

    #[test]
    fn euler_angles_recover_construction_angles() {
        let (x, y, z) = (0.3, -0.7, 1.2);
        assert_abs_diff_eq!(
            Matrix4::rotation_xyz(x, y, z).euler_angles_xyz(),
            Vector3::new(x, y, z),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Matrix4::rotation_zyx(z, y, x).euler_angles_zyx(),
            Vector3::new(x, y, z),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            Matrix4::rotation_yxz(y, x, z).euler_angles_yxz(),
            Vector3::new(x, y, z),
            epsilon = EPSILON
        );
    }

    #[test]
    fn quaternion_of_scaled_rotation_is_rotation() {
        let rotation = UnitQuaternion::from_euler_angles(0.2, -0.4, 0.9);
        let m = Matrix4::from_quaternion(&rotation).scaled(2.0, 3.0, 4.0);
        assert_abs_diff_eq!(
            m.to_quaternion().to_rotation_matrix().into_inner(),
            rotation.to_rotation_matrix().into_inner(),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(m.scale_factors(), Vector3::new(2.0, 3.0, 4.0), epsilon = EPSILON);
    }

    #[test]
    fn axis_angle_of_axis_rotation_is_recovered() {
        let axis = UnitVector3::new_normalize(Vector3::new(1.0, 1.0, 0.0));
        let (recovered_axis, angle) = Matrix4::rotation(0.8, &axis).axis_angle().unwrap();
        assert_abs_diff_eq!(recovered_axis.into_inner(), axis.into_inner(), epsilon = EPSILON);
        assert_abs_diff_eq!(angle, 0.8, epsilon = EPSILON);
        assert!(Matrix4::identity().axis_angle().is_none());
    }
}

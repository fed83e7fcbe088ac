//! Terrain relief for planet meshes.
//!
//! Heights come from multi-octave fBm simplex noise sampled on the unit sphere
//! (offset by a user-controlled noise offset, so a new offset yields a new
//! planet from the same mesh). Vertices are pushed along their normal and the
//! normals are rebuilt from the displaced faces.

use glam::{DVec3, Vec3};
use noise::{NoiseFn, Simplex};

use crate::mesh::Mesh;

/// Parameters for [`TerrainSampler`].
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainParams {
    /// Noise seed.
    pub seed: u32,
    /// Number of octaves summed per sample.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency of the first octave, in cycles per unit of sphere direction.
    pub base_frequency: f64,
    /// Deepest depression below the base radius.
    pub max_depth: f32,
    /// Highest peak above the base radius.
    pub max_height: f32,
    /// Translation applied to the sample point before evaluating noise.
    pub noise_offset: Vec3,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 6,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 1.5,
            max_depth: 30.0,
            max_height: 25.0,
            noise_offset: Vec3::ZERO,
        }
    }
}

/// Samples terrain height for a direction on the planet.
pub struct TerrainSampler {
    noise: Simplex,
    params: TerrainParams,
    max_amplitude: f64,
}

impl TerrainSampler {
    /// Create a new sampler with the given parameters.
    pub fn new(params: TerrainParams) -> Self {
        let noise = Simplex::new(params.seed);
        let max_amplitude = (0..params.octaves)
            .map(|i| params.persistence.powi(i as i32))
            .sum::<f64>()
            .max(f64::EPSILON);
        Self {
            noise,
            params,
            max_amplitude,
        }
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Normalized fBm value in `[-1, 1]` for a direction.
    pub fn sample_normalized(&self, direction: Vec3) -> f64 {
        let point = direction.normalize_or_zero().as_dvec3() + self.params.noise_offset.as_dvec3();

        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = 1.0;
        for _ in 0..self.params.octaves {
            let p: DVec3 = point * frequency;
            total += self.noise.get([p.x, p.y, p.z]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        (total / self.max_amplitude).clamp(-1.0, 1.0)
    }

    /// Terrain height for a direction, in `[-max_depth, max_height]`.
    ///
    /// Positive noise scales into peaks, negative noise into depressions.
    pub fn sample(&self, direction: Vec3) -> f32 {
        let n = self.sample_normalized(direction) as f32;
        if n >= 0.0 {
            n * self.params.max_height
        } else {
            n * self.params.max_depth
        }
    }
}

/// Displace every vertex along its normal by the sampled terrain height, then
/// rebuild smooth normals.
///
/// Tangent data, if any, is cleared since it no longer matches the surface.
pub fn displace_terrain(mesh: &mut Mesh, sampler: &TerrainSampler) {
    debug_assert_eq!(mesh.normals.len(), mesh.positions.len());

    let mut lowest = f32::MAX;
    let mut highest = f32::MIN;
    for (position, normal) in mesh.positions.iter_mut().zip(&mesh.normals) {
        let height = sampler.sample(*normal);
        *position += *normal * height;
        lowest = lowest.min(height);
        highest = highest.max(height);
    }

    recompute_normals(mesh);
    mesh.tangents.clear();
    mesh.bitangents.clear();

    tracing::debug!(
        vertices = mesh.vertex_count(),
        lowest,
        highest,
        "displaced terrain"
    );
}

/// Rebuild per-vertex normals as the area-weighted sum of adjacent face normals.
pub fn recompute_normals(mesh: &mut Mesh) {
    let mut normals = vec![Vec3::ZERO; mesh.positions.len()];

    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (pa, pb, pc) = (mesh.positions[a], mesh.positions[b], mesh.positions[c]);
        // Unnormalized cross product: length is twice the triangle area.
        let face_normal = (pb - pa).cross(pc - pa);
        normals[a] += face_normal;
        normals[b] += face_normal;
        normals[c] += face_normal;
    }

    for n in &mut normals {
        *n = n.normalize_or_zero();
    }
    mesh.normals = normals;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MidpointStrategy, SphereParams, generate_sphere_with};

    fn planet_mesh(radius: f32, subdivisions: u32) -> Mesh {
        generate_sphere_with(&SphereParams {
            radius,
            subdivisions,
            midpoints: MidpointStrategy::Shared,
            reversed: false,
        })
    }

    #[test]
    fn test_determinism_same_seed() {
        let a = TerrainSampler::new(TerrainParams {
            seed: 42,
            ..Default::default()
        });
        let b = TerrainSampler::new(TerrainParams {
            seed: 42,
            ..Default::default()
        });
        let dir = Vec3::new(0.3, 0.5, -0.8);
        assert_eq!(a.sample(dir), b.sample(dir));
    }

    #[test]
    fn test_noise_offset_changes_terrain() {
        let a = TerrainSampler::new(TerrainParams::default());
        let b = TerrainSampler::new(TerrainParams {
            noise_offset: Vec3::new(17.0, 42.0, 3.0),
            ..Default::default()
        });
        let differs = (0..64)
            .map(|i| Vec3::new((i as f32).sin(), (i as f32 * 0.7).cos(), 0.3))
            .any(|d| (a.sample(d) - b.sample(d)).abs() > 1e-3);
        assert!(differs);
    }

    #[test]
    fn test_heights_within_limits() {
        let params = TerrainParams {
            max_depth: 30.0,
            max_height: 25.0,
            ..Default::default()
        };
        let sampler = TerrainSampler::new(params);
        let mesh = planet_mesh(1.0, 3);
        for n in &mesh.normals {
            let h = sampler.sample(*n);
            assert!((-30.0..=25.0).contains(&h), "height {h} out of range");
        }
    }

    #[test]
    fn test_displacement_keeps_vertices_in_shell() {
        let sampler = TerrainSampler::new(TerrainParams::default());
        let mut mesh = planet_mesh(90.0, 3);
        displace_terrain(&mut mesh, &sampler);
        for p in &mesh.positions {
            let r = p.length();
            assert!(r >= 90.0 - 30.0 - 1e-3 && r <= 90.0 + 25.0 + 1e-3, "radius {r}");
        }
        assert_eq!(mesh.validate(), Ok(()));
    }

    #[test]
    fn test_zero_relief_leaves_sphere_intact() {
        let sampler = TerrainSampler::new(TerrainParams {
            max_depth: 0.0,
            max_height: 0.0,
            ..Default::default()
        });
        let original = planet_mesh(10.0, 2);
        let mut mesh = original.clone();
        displace_terrain(&mut mesh, &sampler);
        assert_eq!(mesh.positions, original.positions);
    }

    #[test]
    fn test_recomputed_normals_point_outward() {
        let mut mesh = planet_mesh(5.0, 3);
        recompute_normals(&mut mesh);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!((n.length() - 1.0).abs() < 1e-4);
            assert!(n.dot(p.normalize()) > 0.99);
        }
    }

    #[test]
    fn test_displacement_clears_tangents() {
        let mut mesh = planet_mesh(5.0, 1);
        crate::calculate_tangents(&mut mesh);
        displace_terrain(&mut mesh, &TerrainSampler::new(TerrainParams::default()));
        assert!(!mesh.has_tangents());
    }
}

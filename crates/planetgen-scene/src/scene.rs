//! Planet, atmosphere, and the scene context that owns them.

use std::f32::consts::TAU;
use std::thread;
use std::time::Instant;

use glam::{Mat4, Vec3};
use rand::Rng;

use planetgen_config::{AtmosphereConfig, Config, PlanetConfig};
use planetgen_mesh::{
    MidpointStrategy, Mesh, SphereParams, TerrainParams, TerrainSampler, WeldPolicy,
    calculate_tangents, displace_terrain, generate_sphere_with, split_uv_seam,
};

use crate::camera::OrbitCamera;
use crate::error::SceneError;
use crate::light::DirectionalLight;
use crate::material::Material;

/// Noise offsets are drawn from whole numbers in `0..NOISE_OFFSET_RANGE`.
const NOISE_OFFSET_RANGE: u32 = 99;

/// The planet body.
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    /// Radius of the undeformed sphere.
    pub base_radius: f32,
    /// Atmosphere radius as a multiple of `base_radius`.
    pub atmosphere_ratio: f32,
    /// Icosphere subdivision level.
    pub subdivisions: u32,
    /// Spin around +Y in radians per second.
    pub rotate_speed: f32,
    /// Current spin angle in `[0, TAU)`.
    pub angle: f32,
    /// Relief parameters, including depth/height limits and noise offset.
    pub terrain: TerrainParams,
    pub material: Material,
}

impl Planet {
    pub fn from_config(planet: &PlanetConfig, atmosphere: &AtmosphereConfig) -> Self {
        Self {
            base_radius: planet.base_radius,
            atmosphere_ratio: atmosphere.planet_ratio,
            subdivisions: planet.subdivisions,
            rotate_speed: planet.rotate_speed,
            angle: 0.0,
            terrain: TerrainParams {
                seed: planet.seed,
                octaves: planet.octaves,
                base_frequency: planet.base_frequency,
                max_depth: planet.max_depth,
                max_height: planet.max_height,
                noise_offset: Vec3::from_array(planet.noise_offset),
                ..Default::default()
            },
            material: Material::Simple {
                texture_index: planet.texture_index,
            },
        }
    }

    pub fn atmosphere_radius(&self) -> f32 {
        self.atmosphere_ratio * self.base_radius
    }

    /// Spin transform for the current angle.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.angle)
    }

    /// Pick a fresh noise offset, which yields a different planet from the same mesh.
    pub fn randomize_noise_offset<R: Rng>(&mut self, rng: &mut R) {
        let mut component = || rng.random_range(0..NOISE_OFFSET_RANGE) as f32;
        self.terrain.noise_offset = Vec3::new(component(), component(), component());
    }

    /// Shared-midpoint icosphere, displaced by terrain, with tangents.
    ///
    /// The seam is split after displacement so the duplicated vertices share
    /// the displaced positions and normals.
    pub fn build_mesh(&self) -> Mesh {
        let mut mesh = generate_sphere_with(&SphereParams {
            radius: self.base_radius,
            subdivisions: self.subdivisions,
            midpoints: MidpointStrategy::Shared,
            reversed: false,
        });
        let sampler = TerrainSampler::new(self.terrain.clone());
        displace_terrain(&mut mesh, &sampler);
        split_uv_seam(&mut mesh);
        calculate_tangents(&mut mesh);
        mesh
    }
}

/// The atmosphere shell around the planet, seen from inside as well as outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Atmosphere {
    /// Planet base radius, where scattering starts.
    pub inner_radius: f32,
    /// Shell radius.
    pub outer_radius: f32,
    pub subdivisions: u32,
}

impl Atmosphere {
    pub fn around(planet: &Planet, subdivisions: u32) -> Self {
        Self {
            inner_radius: planet.base_radius,
            outer_radius: planet.atmosphere_radius(),
            subdivisions,
        }
    }

    /// Welded icosphere at the outer radius with inward-facing triangles.
    pub fn build_mesh(&self) -> Mesh {
        generate_sphere_with(&SphereParams {
            radius: self.outer_radius,
            subdivisions: self.subdivisions,
            midpoints: MidpointStrategy::PerTriangle,
            reversed: true,
        })
        .welded(WeldPolicy::Exact)
    }
}

/// Mesh sizes of a built scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStats {
    pub planet_vertices: usize,
    pub planet_triangles: usize,
    pub atmosphere_vertices: usize,
    pub atmosphere_triangles: usize,
}

/// Everything needed to render one planet.
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub planet: Planet,
    pub atmosphere: Atmosphere,
    pub camera: OrbitCamera,
    pub light: DirectionalLight,
    pub planet_mesh: Mesh,
    pub atmosphere_mesh: Mesh,
}

impl SceneContext {
    /// Validate `config` and generate the planet and atmosphere meshes.
    pub fn from_config(config: &Config) -> Result<Self, SceneError> {
        config.validate()?;

        let planet = Planet::from_config(&config.planet, &config.atmosphere);
        let atmosphere = Atmosphere::around(&planet, config.atmosphere.subdivisions);
        let mut camera = OrbitCamera::from_config(&config.camera, 1.0);
        camera.set_aspect_ratio(config.window.width, config.window.height);
        let light = DirectionalLight::from_config(&config.light)?;

        Self::build(planet, atmosphere, camera, light)
    }

    /// Generate both meshes in parallel and assemble the scene.
    pub fn build(
        planet: Planet,
        atmosphere: Atmosphere,
        camera: OrbitCamera,
        light: DirectionalLight,
    ) -> Result<Self, SceneError> {
        let start = Instant::now();
        let (planet_mesh, atmosphere_mesh) = generate_meshes(&planet, &atmosphere)?;

        let scene = Self {
            planet,
            atmosphere,
            camera,
            light,
            planet_mesh,
            atmosphere_mesh,
        };
        let stats = scene.stats();
        tracing::info!(
            planet_vertices = stats.planet_vertices,
            planet_triangles = stats.planet_triangles,
            atmosphere_vertices = stats.atmosphere_vertices,
            atmosphere_triangles = stats.atmosphere_triangles,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scene built"
        );
        Ok(scene)
    }

    pub fn stats(&self) -> SceneStats {
        SceneStats {
            planet_vertices: self.planet_mesh.vertex_count(),
            planet_triangles: self.planet_mesh.triangle_count(),
            atmosphere_vertices: self.atmosphere_mesh.vertex_count(),
            atmosphere_triangles: self.atmosphere_mesh.triangle_count(),
        }
    }

    /// Advance the planet spin by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.planet.angle = (self.planet.angle + self.planet.rotate_speed * dt).rem_euclid(TAU);
    }

    /// Roll a new planet: fresh noise offset, surface texture out of
    /// `texture_count`, and light direction, then rebuild the planet mesh.
    /// The atmosphere mesh is left as is.
    pub fn regenerate_terrain<R: Rng>(
        &mut self,
        rng: &mut R,
        texture_count: u32,
    ) -> Result<(), SceneError> {
        self.planet.randomize_noise_offset(rng);
        if texture_count > 0 {
            self.planet
                .material
                .set_color_texture(rng.random_range(0..texture_count));
        }
        self.light.randomize_direction(rng);

        let start = Instant::now();
        let mesh = self.planet.build_mesh();
        mesh.validate().map_err(|source| SceneError::Mesh {
            mesh: "planet",
            source,
        })?;
        self.planet_mesh = mesh;

        tracing::info!(
            noise_offset = ?self.planet.terrain.noise_offset,
            texture = ?self.planet.material.color_texture(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "terrain regenerated"
        );
        Ok(())
    }
}

/// Build the planet and atmosphere meshes on two named scoped threads.
fn generate_meshes(planet: &Planet, atmosphere: &Atmosphere) -> Result<(Mesh, Mesh), SceneError> {
    const PLANET_WORKER: &str = "planet-mesh";
    const ATMOSPHERE_WORKER: &str = "atmosphere-mesh";

    let (planet_mesh, atmosphere_mesh) = thread::scope(|s| {
        let planet_job = thread::Builder::new()
            .name(PLANET_WORKER.into())
            .spawn_scoped(s, || planet.build_mesh())?;
        let atmosphere_job = thread::Builder::new()
            .name(ATMOSPHERE_WORKER.into())
            .spawn_scoped(s, || atmosphere.build_mesh())?;

        let planet_mesh = planet_job
            .join()
            .map_err(|_| SceneError::WorkerPanicked(PLANET_WORKER))?;
        let atmosphere_mesh = atmosphere_job
            .join()
            .map_err(|_| SceneError::WorkerPanicked(ATMOSPHERE_WORKER))?;
        Ok::<_, SceneError>((planet_mesh, atmosphere_mesh))
    })?;

    planet_mesh.validate().map_err(|source| SceneError::Mesh {
        mesh: "planet",
        source,
    })?;
    atmosphere_mesh.validate().map_err(|source| SceneError::Mesh {
        mesh: "atmosphere",
        source,
    })?;
    Ok((planet_mesh, atmosphere_mesh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetgen_mesh::triangle_winds_outward;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.planet.subdivisions = 3;
        config.atmosphere.subdivisions = 2;
        config
    }

    fn manifold_vertices(level: u32) -> usize {
        10 * 4usize.pow(level) + 2
    }

    #[test]
    fn test_scene_from_default_sized_config() {
        let scene = SceneContext::from_config(&small_config()).unwrap();
        let stats = scene.stats();
        // Seam and pole copies come on top of the manifold vertices.
        assert!(stats.planet_vertices > manifold_vertices(3));
        assert!(stats.planet_vertices < manifold_vertices(3) + 2 * 8usize.pow(2));
        assert_eq!(stats.planet_triangles, 20 * 4usize.pow(3));
        assert_eq!(stats.atmosphere_vertices, manifold_vertices(2));
        assert_eq!(stats.atmosphere_triangles, 20 * 4usize.pow(2));
        assert!((scene.camera.aspect_ratio - 1.25).abs() < 1e-6);
    }

    #[test]
    fn test_planet_mesh_has_relief_and_tangents() {
        let scene = SceneContext::from_config(&small_config()).unwrap();
        let mesh = &scene.planet_mesh;
        assert!(mesh.has_tangents());

        let (lo, hi) = (90.0 - 30.0 - 1e-3, 90.0 + 25.0 + 1e-3);
        let mut any_displaced = false;
        for p in &mesh.positions {
            let r = p.length();
            assert!(r >= lo && r <= hi, "radius {r} outside shell");
            any_displaced |= (r - 90.0).abs() > 1e-2;
        }
        assert!(any_displaced);
    }

    #[test]
    fn test_atmosphere_is_inward_facing_shell() {
        let scene = SceneContext::from_config(&small_config()).unwrap();
        let outer = scene.atmosphere.outer_radius;
        assert!((outer - 90.0 * 1.12).abs() < 1e-3);
        assert_eq!(scene.atmosphere.inner_radius, 90.0);

        let mesh = &scene.atmosphere_mesh;
        for p in &mesh.positions {
            assert!((p.length() - outer).abs() < 1e-2);
        }
        for [a, b, c] in mesh.triangles() {
            let [pa, pb, pc] = [a, b, c].map(|i| mesh.positions[i as usize]);
            assert!(!triangle_winds_outward(pa, pb, pc));
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = small_config();
        config.planet.base_radius = -1.0;
        let result = SceneContext::from_config(&config);
        assert!(matches!(result, Err(SceneError::Config(_))));
    }

    #[test]
    fn test_nan_relief_is_rejected() {
        let mut config = small_config();
        config.planet.max_height = f32::NAN;
        let result = SceneContext::from_config(&config);
        assert!(matches!(result, Err(SceneError::Config(_))));
    }

    #[test]
    fn test_planet_tangents_follow_longitude() {
        let mut config = small_config();
        config.planet.subdivisions = 4;
        config.planet.max_depth = 0.0;
        config.planet.max_height = 0.0;
        let planet = Planet::from_config(&config.planet, &config.atmosphere);
        let mesh = planet.build_mesh();

        let mut checked = 0;
        for (n, t) in mesh.normals.iter().zip(&mesh.tangents) {
            if n.y.abs() >= 0.9 {
                continue;
            }
            let du = Vec3::new(-n.z, 0.0, n.x).normalize();
            assert!(t.dot(du) > 0.5, "tangent {t} deviates from {du} at {n}");
            checked += 1;
        }
        assert!(checked > manifold_vertices(4) / 2);
    }

    #[test]
    fn test_seam_copies_reuse_manifold_positions() {
        let scene = SceneContext::from_config(&small_config()).unwrap();
        let mut positions: Vec<[u32; 3]> = scene
            .planet_mesh
            .positions
            .iter()
            .map(|p| p.to_array().map(f32::to_bits))
            .collect();
        positions.sort_unstable();
        positions.dedup();
        assert_eq!(positions.len(), manifold_vertices(3));
    }

    #[test]
    fn test_update_spins_and_wraps() {
        let mut scene = SceneContext::from_config(&small_config()).unwrap();
        scene.update(10.0);
        assert!((scene.planet.angle - 0.3).abs() < 1e-5);

        scene.planet.rotate_speed = 1.0;
        scene.update(TAU);
        assert!((0.0..TAU).contains(&scene.planet.angle));
        assert!((scene.planet.angle - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_noise_offset_is_whole_numbers_in_range() {
        let mut planet = Planet::from_config(&PlanetConfig::default(), &AtmosphereConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..32 {
            planet.randomize_noise_offset(&mut rng);
            for c in planet.terrain.noise_offset.to_array() {
                assert!((0.0..99.0).contains(&c));
                assert_eq!(c.fract(), 0.0);
            }
        }
    }

    #[test]
    fn test_regenerate_keeps_topology_and_atmosphere() {
        let mut scene = SceneContext::from_config(&small_config()).unwrap();
        let before = scene.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        scene.regenerate_terrain(&mut rng, 4).unwrap();

        assert_eq!(scene.planet_mesh.indices, before.planet_mesh.indices);
        assert_ne!(scene.planet_mesh.positions, before.planet_mesh.positions);
        assert_eq!(scene.atmosphere_mesh, before.atmosphere_mesh);
        assert!(scene.planet.material.color_texture().is_some_and(|t| t < 4));
        assert!((scene.light.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_regenerate_is_deterministic_per_rng_seed() {
        let mut a = SceneContext::from_config(&small_config()).unwrap();
        let mut b = a.clone();
        a.regenerate_terrain(&mut ChaCha8Rng::seed_from_u64(5), 4).unwrap();
        b.regenerate_terrain(&mut ChaCha8Rng::seed_from_u64(5), 4).unwrap();
        assert_eq!(a.planet_mesh, b.planet_mesh);
        assert_eq!(a.light, b.light);
    }
}

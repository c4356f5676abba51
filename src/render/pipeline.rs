use web_sys::{
    WebGl2RenderingContext as Gl, WebGlBuffer, WebGlFramebuffer, WebGlProgram, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::Result;
use crate::geometry::{Mesh, VERTEX_STRIDE};
use crate::math::Vec3;
use crate::scene::{Material, PartKind, ParticleField, Scene, POINT_STRIDE};
use super::shaders::*;
use super::webgl::WebGLContext;

/// Indexed mesh resident on the GPU
struct GpuMesh {
    vao: WebGlVertexArrayObject,
    // Kept so the buffers live as long as the VAO
    _vertex_buffer: WebGlBuffer,
    _index_buffer: WebGlBuffer,
    index_count: i32,
}

struct GpuPoints {
    vao: WebGlVertexArrayObject,
    _buffer: WebGlBuffer,
    count: i32,
}

struct ShadowTarget {
    texture: WebGlTexture,
    fbo: WebGlFramebuffer,
    size: i32,
}

/// Cached uniform locations for the lit mesh shader
struct LitUniforms {
    model: Option<WebGlUniformLocation>,
    view_projection: Option<WebGlUniformLocation>,
    light_space: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    light_dir: Option<WebGlUniformLocation>,
    light_color: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    roughness: Option<WebGlUniformLocation>,
    metalness: Option<WebGlUniformLocation>,
    clearcoat: Option<WebGlUniformLocation>,
    clearcoat_roughness: Option<WebGlUniformLocation>,
    emissive: Option<WebGlUniformLocation>,
    emissive_intensity: Option<WebGlUniformLocation>,
    shadow_map: Option<WebGlUniformLocation>,
    shadow_texel: Option<WebGlUniformLocation>,
    receive_shadow: Option<WebGlUniformLocation>,
    exposure: Option<WebGlUniformLocation>,
}

struct UnlitUniforms {
    model: Option<WebGlUniformLocation>,
    view_projection: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
    exposure: Option<WebGlUniformLocation>,
}

struct ShadowUniforms {
    model: Option<WebGlUniformLocation>,
    light_space: Option<WebGlUniformLocation>,
}

struct PointsUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    size: Option<WebGlUniformLocation>,
    scale: Option<WebGlUniformLocation>,
    sprite: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
    exposure: Option<WebGlUniformLocation>,
}

/// Output settings that do not live in the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub clear_color: [f32; 4],
    pub exposure: f32,
}

/// WebGL2 renderer for a [`Scene`]: shadow pass, lit flower, sparkles, points
pub struct RenderPipeline {
    ctx: WebGLContext,
    settings: RenderSettings,

    lit_program: WebGlProgram,
    unlit_program: WebGlProgram,
    shadow_program: WebGlProgram,
    points_program: WebGlProgram,

    lit_uniforms: LitUniforms,
    unlit_uniforms: UnlitUniforms,
    shadow_uniforms: ShadowUniforms,
    points_uniforms: PointsUniforms,

    stem: GpuMesh,
    leaf: GpuMesh,
    center: GpuMesh,
    petal: GpuMesh,
    sparkle: GpuMesh,
    points: GpuPoints,
    sprite: WebGlTexture,
    shadow: ShadowTarget,

    // Drawing buffer size in device pixels
    width: i32,
    height: i32,
}

impl RenderPipeline {
    /// Compile programs and upload every mesh of the scene
    pub fn new(gl: Gl, scene: &Scene, settings: RenderSettings, width: i32, height: i32) -> Result<Self> {
        let ctx = WebGLContext::new(gl);

        let lit_program = ctx.create_program(MESH_VERTEX_SHADER, LIT_FRAGMENT_SHADER)?;
        let unlit_program = ctx.create_program(MESH_VERTEX_SHADER, UNLIT_FRAGMENT_SHADER)?;
        let shadow_program = ctx.create_program(SHADOW_VERTEX_SHADER, SHADOW_FRAGMENT_SHADER)?;
        let points_program = ctx.create_program(POINTS_VERTEX_SHADER, POINTS_FRAGMENT_SHADER)?;

        let lit_uniforms = LitUniforms {
            model: ctx.get_uniform_location(&lit_program, "u_model"),
            view_projection: ctx.get_uniform_location(&lit_program, "u_view_projection"),
            light_space: ctx.get_uniform_location(&lit_program, "u_light_space"),
            camera_pos: ctx.get_uniform_location(&lit_program, "u_camera_pos"),
            light_dir: ctx.get_uniform_location(&lit_program, "u_light_dir"),
            light_color: ctx.get_uniform_location(&lit_program, "u_light_color"),
            ambient: ctx.get_uniform_location(&lit_program, "u_ambient"),
            color: ctx.get_uniform_location(&lit_program, "u_color"),
            roughness: ctx.get_uniform_location(&lit_program, "u_roughness"),
            metalness: ctx.get_uniform_location(&lit_program, "u_metalness"),
            clearcoat: ctx.get_uniform_location(&lit_program, "u_clearcoat"),
            clearcoat_roughness: ctx.get_uniform_location(&lit_program, "u_clearcoat_roughness"),
            emissive: ctx.get_uniform_location(&lit_program, "u_emissive"),
            emissive_intensity: ctx.get_uniform_location(&lit_program, "u_emissive_intensity"),
            shadow_map: ctx.get_uniform_location(&lit_program, "u_shadow_map"),
            shadow_texel: ctx.get_uniform_location(&lit_program, "u_shadow_texel"),
            receive_shadow: ctx.get_uniform_location(&lit_program, "u_receive_shadow"),
            exposure: ctx.get_uniform_location(&lit_program, "u_exposure"),
        };

        let unlit_uniforms = UnlitUniforms {
            model: ctx.get_uniform_location(&unlit_program, "u_model"),
            view_projection: ctx.get_uniform_location(&unlit_program, "u_view_projection"),
            color: ctx.get_uniform_location(&unlit_program, "u_color"),
            opacity: ctx.get_uniform_location(&unlit_program, "u_opacity"),
            exposure: ctx.get_uniform_location(&unlit_program, "u_exposure"),
        };

        let shadow_uniforms = ShadowUniforms {
            model: ctx.get_uniform_location(&shadow_program, "u_model"),
            light_space: ctx.get_uniform_location(&shadow_program, "u_light_space"),
        };

        let points_uniforms = PointsUniforms {
            model: ctx.get_uniform_location(&points_program, "u_model"),
            view: ctx.get_uniform_location(&points_program, "u_view"),
            projection: ctx.get_uniform_location(&points_program, "u_projection"),
            size: ctx.get_uniform_location(&points_program, "u_size"),
            scale: ctx.get_uniform_location(&points_program, "u_scale"),
            sprite: ctx.get_uniform_location(&points_program, "u_sprite"),
            opacity: ctx.get_uniform_location(&points_program, "u_opacity"),
            exposure: ctx.get_uniform_location(&points_program, "u_exposure"),
        };

        let meshes = &scene.flower.meshes;
        let stem = upload_mesh(&ctx, &meshes.stem)?;
        let leaf = upload_mesh(&ctx, &meshes.leaf)?;
        let center = upload_mesh(&ctx, &meshes.center)?;
        let petal = upload_mesh(&ctx, &meshes.petal)?;
        let sparkle = upload_mesh(&ctx, &scene.sparkle_mesh)?;
        let points = upload_points(&ctx, &scene.particles)?;

        let sprite_size = scene.sprite.size as i32;
        let sprite = ctx.create_rgba_texture(sprite_size, sprite_size, &scene.sprite.pixels)?;

        let shadow_size = scene.lighting.key.shadow_map_size as i32;
        let shadow_texture = ctx.create_depth_texture(shadow_size)?;
        let shadow_fbo = ctx.create_depth_framebuffer(&shadow_texture)?;

        log::info!(
            "Render pipeline ready: {} flower parts, {} points, {}px shadow map",
            scene.flower.instances.len(),
            points.count,
            shadow_size
        );

        Ok(Self {
            ctx,
            settings,
            lit_program,
            unlit_program,
            shadow_program,
            points_program,
            lit_uniforms,
            unlit_uniforms,
            shadow_uniforms,
            points_uniforms,
            stem,
            leaf,
            center,
            petal,
            sparkle,
            points,
            sprite,
            shadow: ShadowTarget {
                texture: shadow_texture,
                fbo: shadow_fbo,
                size: shadow_size,
            },
            width: width.max(1),
            height: height.max(1),
        })
    }

    pub fn is_context_lost(&self) -> bool {
        self.ctx.is_context_lost()
    }

    /// Set the drawing buffer size in device pixels
    pub fn resize(&mut self, width: i32, height: i32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
    }

    fn gpu_mesh(&self, part: PartKind) -> &GpuMesh {
        match part {
            PartKind::Stem => &self.stem,
            PartKind::Leaf => &self.leaf,
            PartKind::Center => &self.center,
            PartKind::Petal { .. } => &self.petal,
        }
    }

    fn draw_mesh(&self, mesh: &GpuMesh) {
        let gl = &self.ctx.gl;
        gl.bind_vertex_array(Some(&mesh.vao));
        gl.draw_elements_with_i32(Gl::TRIANGLES, mesh.index_count, Gl::UNSIGNED_INT, 0);
    }

    /// Render a frame
    pub fn render(&self, scene: &Scene) {
        let gl = &self.ctx.gl;
        let flower = &scene.flower;
        let light_space = scene
            .lighting
            .key
            .shadow_matrix(Vec3::ZERO, flower.bounding_radius());

        // === Pass 1: Key light depth ===
        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&self.shadow.fbo));
        self.ctx.viewport(0, 0, self.shadow.size, self.shadow.size);
        gl.enable(Gl::DEPTH_TEST);
        gl.depth_mask(true);
        gl.disable(Gl::BLEND);
        gl.clear(Gl::DEPTH_BUFFER_BIT);
        gl.enable(Gl::POLYGON_OFFSET_FILL);
        gl.polygon_offset(2.0, 4.0);

        gl.use_program(Some(&self.shadow_program));
        self.ctx
            .uniform_matrix4fv(self.shadow_uniforms.light_space.as_ref(), light_space.as_slice());
        for instance in flower.instances.iter().filter(|i| i.cast_shadow) {
            let model = flower.world_matrix(instance);
            self.ctx.uniform_matrix4fv(self.shadow_uniforms.model.as_ref(), model.as_slice());
            self.draw_mesh(self.gpu_mesh(instance.part));
        }
        gl.disable(Gl::POLYGON_OFFSET_FILL);

        // === Pass 2: Lit flower ===
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
        self.ctx.viewport(0, 0, self.width, self.height);
        self.ctx.clear(self.settings.clear_color);

        let view = scene.camera.view_matrix();
        let projection = scene.camera.projection_matrix();
        let view_projection = projection.mul(&view);

        gl.use_program(Some(&self.lit_program));
        let u = &self.lit_uniforms;
        self.ctx.uniform_matrix4fv(u.view_projection.as_ref(), view_projection.as_slice());
        self.ctx.uniform_matrix4fv(u.light_space.as_ref(), light_space.as_slice());
        let eye = scene.camera.position;
        self.ctx.uniform_3f(u.camera_pos.as_ref(), eye.x, eye.y, eye.z);

        let mut dirs = Vec::with_capacity(9);
        let mut colors = Vec::with_capacity(9);
        for light in scene.lighting.directional() {
            dirs.extend_from_slice(&light.direction().to_array());
            colors.extend_from_slice(&light.color.scale(light.intensity).to_array());
        }
        self.ctx.uniform_3fv(u.light_dir.as_ref(), &dirs);
        self.ctx.uniform_3fv(u.light_color.as_ref(), &colors);
        let ambient = scene.lighting.ambient.color.scale(scene.lighting.ambient.intensity);
        self.ctx.uniform_3f(u.ambient.as_ref(), ambient.x, ambient.y, ambient.z);
        self.ctx.uniform_1f(u.exposure.as_ref(), self.settings.exposure);

        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, Some(&self.shadow.texture));
        self.ctx.uniform_1i(u.shadow_map.as_ref(), 0);
        let texel = 1.0 / self.shadow.size as f32;
        self.ctx.uniform_2f(u.shadow_texel.as_ref(), texel, texel);

        for instance in &flower.instances {
            let model = flower.world_matrix(instance);
            self.ctx.uniform_matrix4fv(u.model.as_ref(), model.as_slice());
            self.ctx.uniform_1i(u.receive_shadow.as_ref(), instance.receive_shadow as i32);
            self.apply_material(&instance.material.borrow());
            self.draw_mesh(self.gpu_mesh(instance.part));
        }

        // Transparent passes test depth but do not write it
        gl.depth_mask(false);

        // === Pass 3: Sparkles ===
        if !scene.sparkles.is_empty() {
            gl.use_program(Some(&self.unlit_program));
            self.ctx.enable_blending();
            let u = &self.unlit_uniforms;
            self.ctx.uniform_matrix4fv(u.view_projection.as_ref(), view_projection.as_slice());
            self.ctx.uniform_3f(u.color.as_ref(), 1.0, 1.0, 1.0);
            self.ctx.uniform_1f(u.exposure.as_ref(), self.settings.exposure);

            for sparkle in scene.sparkles.iter() {
                self.ctx.uniform_matrix4fv(u.model.as_ref(), sparkle.model_matrix().as_slice());
                self.ctx.uniform_1f(u.opacity.as_ref(), sparkle.opacity);
                self.draw_mesh(&self.sparkle);
            }
        }

        // === Pass 4: Background points ===
        if self.points.count > 0 {
            gl.use_program(Some(&self.points_program));
            self.ctx.enable_additive_blending();
            let u = &self.points_uniforms;
            self.ctx
                .uniform_matrix4fv(u.model.as_ref(), scene.particles.model_matrix().as_slice());
            self.ctx.uniform_matrix4fv(u.view.as_ref(), view.as_slice());
            self.ctx.uniform_matrix4fv(u.projection.as_ref(), projection.as_slice());
            self.ctx.uniform_1f(u.size.as_ref(), scene.particles.base_size);
            self.ctx.uniform_1f(u.scale.as_ref(), self.height as f32 / 2.0);
            self.ctx.uniform_1f(u.opacity.as_ref(), scene.particles.opacity);
            self.ctx.uniform_1f(u.exposure.as_ref(), self.settings.exposure);

            gl.active_texture(Gl::TEXTURE0);
            gl.bind_texture(Gl::TEXTURE_2D, Some(&self.sprite));
            self.ctx.uniform_1i(u.sprite.as_ref(), 0);

            gl.bind_vertex_array(Some(&self.points.vao));
            gl.draw_arrays(Gl::POINTS, 0, self.points.count);
        }

        gl.depth_mask(true);
        gl.disable(Gl::BLEND);
        gl.bind_vertex_array(None);
    }

    fn apply_material(&self, material: &Material) {
        let u = &self.lit_uniforms;
        let c = material.color;
        let e = material.emissive;
        self.ctx.uniform_3f(u.color.as_ref(), c.x, c.y, c.z);
        self.ctx.uniform_1f(u.roughness.as_ref(), material.roughness);
        self.ctx.uniform_1f(u.metalness.as_ref(), material.metalness);
        self.ctx.uniform_1f(u.clearcoat.as_ref(), material.clearcoat);
        self.ctx
            .uniform_1f(u.clearcoat_roughness.as_ref(), material.clearcoat_roughness);
        self.ctx.uniform_3f(u.emissive.as_ref(), e.x, e.y, e.z);
        self.ctx
            .uniform_1f(u.emissive_intensity.as_ref(), material.emissive_intensity);
    }
}

/// Upload a mesh with position(3) + normal(3) + uv(2) interleaved
fn upload_mesh(ctx: &WebGLContext, mesh: &Mesh) -> Result<GpuMesh> {
    let gl = &ctx.gl;

    let vao = ctx.create_vao()?;
    gl.bind_vertex_array(Some(&vao));

    let vertex_buffer = ctx.create_buffer_f32(&mesh.vertex_data(), Gl::STATIC_DRAW)?;
    let index_buffer = ctx.create_index_buffer(mesh.index_data(), Gl::STATIC_DRAW)?;

    let stride = (VERTEX_STRIDE * 4) as i32;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vertex_buffer));

    // Position (location 0)
    gl.enable_vertex_attrib_array(0);
    gl.vertex_attrib_pointer_with_i32(0, 3, Gl::FLOAT, false, stride, 0);

    // Normal (location 1)
    gl.enable_vertex_attrib_array(1);
    gl.vertex_attrib_pointer_with_i32(1, 3, Gl::FLOAT, false, stride, 12);

    // UV (location 2)
    gl.enable_vertex_attrib_array(2);
    gl.vertex_attrib_pointer_with_i32(2, 2, Gl::FLOAT, false, stride, 24);

    gl.bind_vertex_array(None);
    gl.bind_buffer(Gl::ARRAY_BUFFER, None);

    Ok(GpuMesh {
        vao,
        _vertex_buffer: vertex_buffer,
        _index_buffer: index_buffer,
        index_count: mesh.index_data().len() as i32,
    })
}

/// Upload the static point cloud: position(3) + size(1)
fn upload_points(ctx: &WebGLContext, field: &ParticleField) -> Result<GpuPoints> {
    let gl = &ctx.gl;

    let vao = ctx.create_vao()?;
    gl.bind_vertex_array(Some(&vao));

    let buffer = ctx.create_buffer_f32(&field.vertex_data(), Gl::STATIC_DRAW)?;
    let stride = (POINT_STRIDE * 4) as i32;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));

    gl.enable_vertex_attrib_array(0);
    gl.vertex_attrib_pointer_with_i32(0, 3, Gl::FLOAT, false, stride, 0);

    gl.enable_vertex_attrib_array(1);
    gl.vertex_attrib_pointer_with_i32(1, 1, Gl::FLOAT, false, stride, 12);

    gl.bind_vertex_array(None);
    gl.bind_buffer(Gl::ARRAY_BUFFER, None);

    Ok(GpuPoints {
        vao,
        _buffer: buffer,
        count: field.len() as i32,
    })
}


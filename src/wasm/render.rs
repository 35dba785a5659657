//! WebGL2 renderer: an opaque lit pass followed by an additive pass for glows and points.

use std::collections::HashMap;

use glam::{Mat3, Mat4, Vec3};
use js_sys::{Float32Array, Object, Reflect, Uint32Array};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::shaders;
use crate::color::Color;
use crate::error::{SceneError, SceneResult};
use crate::geometry::MeshData;
use crate::material::{GlowMaterial, PointsMaterial, StandardMaterial};
use crate::scene::Scene;

const POSITION_SLOT: u32 = 0;
const SECOND_SLOT: u32 = 1;

/// Linked program plus the uniform locations it was asked for.
struct Program {
    program: WebGlProgram,
    uniforms: HashMap<String, WebGlUniformLocation>,
}

impl Program {
    fn new(gl: &GL, vertex: &str, fragment: &str, uniforms: &[String]) -> SceneResult<Self> {
        let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
        let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
        let program = gl
            .create_program()
            .ok_or_else(|| SceneError::webgl("unable to create program"))?;
        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);
        gl.link_program(&program);
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));
        let linked = gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if !linked {
            let info = gl.get_program_info_log(&program).unwrap_or_default();
            log::error!("program link failed: {info}");
            return Err(SceneError::webgl(format!("link failed: {info}")));
        }
        let uniforms = uniforms
            .iter()
            .filter_map(|name| {
                let loc = gl.get_uniform_location(&program, name);
                if loc.is_none() {
                    log::debug!("uniform {name} is unused");
                }
                loc.map(|loc| (name.clone(), loc))
            })
            .collect();
        Ok(Self { program, uniforms })
    }

    fn loc(&self, name: &str) -> Option<&WebGlUniformLocation> {
        self.uniforms.get(name)
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> SceneResult<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| SceneError::webgl("unable to create shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    let ok = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if ok {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        log::error!("shader compile failed: {info}");
        gl.delete_shader(Some(&shader));
        Err(SceneError::webgl(format!("shader compile failed: {info}")))
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn upload_f32(gl: &GL, buffer: &WebGlBuffer, data: &[f32], usage: u32) {
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    let array = Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, usage);
}

fn vec3_attribute(gl: &GL, slot: u32, data: &[Vec3], usage: u32) -> SceneResult<WebGlBuffer> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| SceneError::webgl("unable to create buffer"))?;
    upload_f32(gl, &buffer, bytemuck::cast_slice(data), usage);
    gl.enable_vertex_attrib_array(slot);
    gl.vertex_attrib_pointer_with_i32(slot, 3, GL::FLOAT, false, 0, 0);
    Ok(buffer)
}

/// Indexed triangle mesh resident on the GPU.
struct GpuMesh {
    vao: WebGlVertexArrayObject,
    buffers: Vec<WebGlBuffer>,
    index_count: i32,
}

impl GpuMesh {
    fn upload(gl: &GL, mesh: &MeshData) -> SceneResult<Self> {
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| SceneError::webgl("unable to create vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        let positions = vec3_attribute(gl, POSITION_SLOT, &mesh.positions, GL::STATIC_DRAW)?;
        let normals = vec3_attribute(gl, SECOND_SLOT, &mesh.normals, GL::STATIC_DRAW)?;
        let indices = gl
            .create_buffer()
            .ok_or_else(|| SceneError::webgl("unable to create index buffer"))?;
        gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&indices));
        let array = Uint32Array::from(mesh.indices.as_slice());
        gl.buffer_data_with_array_buffer_view(GL::ELEMENT_ARRAY_BUFFER, &array, GL::STATIC_DRAW);
        gl.bind_vertex_array(None);
        Ok(Self {
            vao,
            buffers: vec![positions, normals, indices],
            index_count: mesh.indices.len() as i32,
        })
    }

    fn draw(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_elements_with_i32(GL::TRIANGLES, self.index_count, GL::UNSIGNED_INT, 0);
    }

    fn delete(self, gl: &GL) {
        for buffer in &self.buffers {
            gl.delete_buffer(Some(buffer));
        }
        gl.delete_vertex_array(Some(&self.vao));
    }
}

/// Point cloud with per-point colour.
struct GpuPoints {
    vao: WebGlVertexArrayObject,
    positions: WebGlBuffer,
    colors: WebGlBuffer,
    count: i32,
}

impl GpuPoints {
    fn upload(gl: &GL, positions: &[Vec3], colors: &[Vec3], usage: u32) -> SceneResult<Self> {
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| SceneError::webgl("unable to create vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        let position_buffer = vec3_attribute(gl, POSITION_SLOT, positions, usage)?;
        let color_buffer = vec3_attribute(gl, SECOND_SLOT, colors, usage)?;
        gl.bind_vertex_array(None);
        Ok(Self {
            vao,
            positions: position_buffer,
            colors: color_buffer,
            count: positions.len() as i32,
        })
    }

    fn update(&mut self, gl: &GL, positions: &[Vec3], colors: &[Vec3]) {
        upload_f32(gl, &self.positions, bytemuck::cast_slice(positions), GL::DYNAMIC_DRAW);
        upload_f32(gl, &self.colors, bytemuck::cast_slice(colors), GL::DYNAMIC_DRAW);
        self.count = positions.len() as i32;
    }

    fn draw(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::POINTS, 0, self.count);
    }
}

struct Frame {
    view: Mat4,
    projection: Mat4,
}

pub struct Renderer {
    gl: GL,
    standard: Program,
    glow: Program,
    points: Program,
    heart: GpuMesh,
    halo: GpuMesh,
    rings: Vec<GpuMesh>,
    mini_heart: GpuMesh,
    stars: GpuPoints,
    sparks: GpuPoints,
    text: Vec<GpuMesh>,
    text_generation: u32,
    spark_colors: Vec<Vec3>,
    exposure: f32,
    width: i32,
    height: i32,
}

fn webgl2_context(canvas: &HtmlCanvasElement) -> SceneResult<GL> {
    let options = Object::new();
    for (key, value) in [
        ("antialias", JsValue::TRUE),
        ("alpha", JsValue::TRUE),
        ("powerPreference", JsValue::from_str("high-performance")),
    ] {
        Reflect::set(&options, &JsValue::from_str(key), &value)?;
    }
    canvas
        .get_context_with_context_options("webgl2", &options)?
        .ok_or_else(|| SceneError::webgl("WebGL2 not supported"))?
        .dyn_into::<GL>()
        .map_err(|_| SceneError::webgl("context is not WebGL2"))
}

impl Renderer {
    pub fn new(canvas: &HtmlCanvasElement, scene: &Scene) -> SceneResult<Self> {
        let gl = webgl2_context(canvas)?;

        let mut standard_uniforms = names(&[
            "u_model",
            "u_view",
            "u_projection",
            "u_normal_matrix",
            "u_camera",
            "u_color",
            "u_roughness",
            "u_metalness",
            "u_emissive",
            "u_ambient",
            "u_exposure",
        ]);
        for i in 0..shaders::MAX_POINT_LIGHTS {
            for field in ["position", "radiance", "distance", "decay"] {
                standard_uniforms.push(format!("u_light_{field}[{i}]"));
            }
        }
        let standard = Program::new(
            &gl,
            shaders::MESH_VERTEX,
            &shaders::standard_fragment(),
            &standard_uniforms,
        )?;
        let glow = Program::new(
            &gl,
            shaders::MESH_VERTEX,
            &shaders::glow_fragment(),
            &names(&[
                "u_model",
                "u_view",
                "u_projection",
                "u_normal_matrix",
                "u_color",
                "u_opacity",
                "u_exposure",
            ]),
        )?;
        let points = Program::new(
            &gl,
            shaders::POINTS_VERTEX,
            &shaders::points_fragment(),
            &names(&[
                "u_model",
                "u_view",
                "u_projection",
                "u_size",
                "u_scale",
                "u_attenuate",
                "u_opacity",
                "u_exposure",
            ]),
        )?;

        let rings = scene
            .rings
            .iter()
            .map(|ring| GpuMesh::upload(&gl, &ring.mesh))
            .collect::<SceneResult<Vec<_>>>()?;
        let mut spark_colors = Vec::with_capacity(scene.sparks.capacity());
        scene.sparks.visible_colors(&mut spark_colors);

        Ok(Self {
            heart: GpuMesh::upload(&gl, &scene.heart_mesh)?,
            halo: GpuMesh::upload(&gl, &scene.halo_mesh)?,
            rings,
            mini_heart: GpuMesh::upload(&gl, &scene.mini_heart_mesh)?,
            stars: GpuPoints::upload(
                &gl,
                &scene.stars.positions,
                &scene.stars.colors,
                GL::STATIC_DRAW,
            )?,
            sparks: GpuPoints::upload(
                &gl,
                scene.sparks.positions(),
                &spark_colors,
                GL::DYNAMIC_DRAW,
            )?,
            text: Vec::new(),
            text_generation: 0,
            spark_colors,
            exposure: scene.config().renderer.exposure,
            standard,
            glow,
            points,
            gl,
            width: 1,
            height: 1,
        })
    }

    /// Sets the drawing-buffer size in device pixels.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width.max(1) as i32;
        self.height = height.max(1) as i32;
    }

    fn sync_text(&mut self, scene: &Scene) -> SceneResult<()> {
        if self.text_generation == scene.text.generation {
            return Ok(());
        }
        for mesh in self.text.drain(..) {
            mesh.delete(&self.gl);
        }
        for piece in &scene.text.pieces {
            self.text.push(GpuMesh::upload(&self.gl, &piece.mesh)?);
        }
        self.text_generation = scene.text.generation;
        Ok(())
    }

    fn set_mat4(&self, program: &Program, name: &str, m: &Mat4) {
        self.gl
            .uniform_matrix4fv_with_f32_array(program.loc(name), false, &m.to_cols_array());
    }

    fn set_vec3(&self, program: &Program, name: &str, v: Vec3) {
        self.gl.uniform3f(program.loc(name), v.x, v.y, v.z);
    }

    fn set_color(&self, program: &Program, name: &str, c: Color) {
        self.gl.uniform3f(program.loc(name), c.r, c.g, c.b);
    }

    fn set_f32(&self, program: &Program, name: &str, v: f32) {
        self.gl.uniform1f(program.loc(name), v);
    }

    fn set_model(&self, program: &Program, model: &Mat4) {
        self.set_mat4(program, "u_model", model);
        let normal_matrix = Mat3::from_mat4(*model).inverse().transpose();
        self.gl.uniform_matrix3fv_with_f32_array(
            program.loc("u_normal_matrix"),
            false,
            &normal_matrix.to_cols_array(),
        );
    }

    fn begin(&self, program: &Program, frame: &Frame) {
        self.gl.use_program(Some(&program.program));
        self.set_mat4(program, "u_view", &frame.view);
        self.set_mat4(program, "u_projection", &frame.projection);
        self.set_f32(program, "u_exposure", self.exposure);
    }

    fn draw_standard(&self, mesh: &GpuMesh, model: &Mat4, material: &StandardMaterial, color: Color) {
        let p = &self.standard;
        self.set_model(p, model);
        self.set_color(p, "u_color", color);
        self.set_f32(p, "u_roughness", material.roughness);
        self.set_f32(p, "u_metalness", material.metalness);
        self.set_color(p, "u_emissive", material.emissive_radiance());
        mesh.draw(&self.gl);
    }

    fn draw_glow(&self, mesh: &GpuMesh, model: &Mat4, material: &GlowMaterial) {
        let p = &self.glow;
        self.set_model(p, model);
        self.set_color(p, "u_color", material.color);
        self.set_f32(p, "u_opacity", material.opacity);
        mesh.draw(&self.gl);
    }

    fn draw_points(&self, points: &GpuPoints, model: &Mat4, material: &PointsMaterial) {
        let p = &self.points;
        self.set_mat4(p, "u_model", model);
        self.set_f32(p, "u_size", material.size);
        self.set_f32(p, "u_scale", self.height as f32 * 0.5);
        self.gl
            .uniform1i(p.loc("u_attenuate"), material.size_attenuation as i32);
        self.set_f32(p, "u_opacity", material.opacity);
        points.draw(&self.gl);
    }

    pub fn render(&mut self, scene: &Scene) -> SceneResult<()> {
        self.sync_text(scene)?;
        scene.sparks.visible_colors(&mut self.spark_colors);
        self.sparks
            .update(&self.gl, scene.sparks.positions(), &self.spark_colors);

        let gl = &self.gl;
        gl.viewport(0, 0, self.width, self.height);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        let frame = Frame {
            view: scene.camera.view_matrix(),
            projection: scene.camera.projection_matrix(),
        };

        // Opaque pass.
        gl.enable(GL::DEPTH_TEST);
        gl.depth_mask(true);
        gl.disable(GL::BLEND);
        gl.enable(GL::CULL_FACE);
        gl.cull_face(GL::BACK);

        let p = &self.standard;
        self.begin(p, &frame);
        self.set_vec3(p, "u_camera", scene.camera.position);
        self.set_color(p, "u_ambient", scene.ambient.color.scaled(scene.ambient.intensity));
        for (i, light) in scene.point_lights().iter().enumerate() {
            self.set_vec3(p, &format!("u_light_position[{i}]"), light.position);
            self.set_color(p, &format!("u_light_radiance[{i}]"), light.radiance());
            self.set_f32(p, &format!("u_light_distance[{i}]"), light.distance);
            self.set_f32(p, &format!("u_light_decay[{i}]"), light.decay);
        }

        self.draw_standard(
            &self.heart,
            &scene.heart.matrix(),
            &scene.heart_material,
            scene.heart_material.color,
        );
        for heart in scene.mini_hearts.hearts() {
            self.draw_standard(
                &self.mini_heart,
                &heart.transform.matrix(),
                &scene.mini_heart_material,
                heart.color,
            );
        }
        if scene.text.visible {
            let group = scene.text.group.matrix();
            for (mesh, piece) in self.text.iter().zip(&scene.text.pieces) {
                self.draw_standard(
                    mesh,
                    &(group * piece.transform.matrix()),
                    &scene.text.material,
                    scene.text.material.color,
                );
            }
        }

        // Additive pass: glows and particles never write depth.
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE);
        gl.depth_mask(false);

        self.begin(&self.glow, &frame);
        self.draw_glow(&self.halo, &scene.halo.matrix(), &scene.halo_material);
        for (mesh, ring) in self.rings.iter().zip(&scene.rings) {
            self.draw_glow(mesh, &ring.transform.matrix(), &ring.material);
        }

        gl.disable(GL::CULL_FACE);
        self.begin(&self.points, &frame);
        let star_material = PointsMaterial {
            size: scene.stars.size,
            opacity: scene.stars.opacity,
            size_attenuation: true,
        };
        self.draw_points(&self.stars, &scene.stars.transform.matrix(), &star_material);
        self.draw_points(&self.sparks, &Mat4::IDENTITY, &scene.spark_material);

        gl.depth_mask(true);
        gl.bind_vertex_array(None);
        Ok(())
    }
}

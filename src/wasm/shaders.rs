//! GLSL ES 3.00 sources. Attribute slots: 0 = position, 1 = normal or colour.

pub const MAX_POINT_LIGHTS: usize = 3;

/// Shared by every fragment shader: exposure, ACES filmic curve, sRGB encode.
const OUTPUT_CHUNK: &str = r#"
uniform float u_exposure;

vec3 rrt_and_odt_fit(vec3 v) {
    vec3 a = v * (v + 0.0245786) - 0.000090537;
    vec3 b = v * (0.983729 * v + 0.4329510) + 0.238081;
    return a / b;
}

vec3 aces_filmic(vec3 color) {
    const mat3 input_mat = mat3(
        vec3(0.59719, 0.07600, 0.02840),
        vec3(0.35458, 0.90834, 0.13383),
        vec3(0.04823, 0.01566, 0.83777));
    const mat3 output_mat = mat3(
        vec3(1.60475, -0.10208, -0.00327),
        vec3(-0.53108, 1.10813, -0.07276),
        vec3(-0.07367, -0.00605, 1.07602));
    color *= u_exposure / 0.6;
    color = input_mat * color;
    color = rrt_and_odt_fit(color);
    color = output_mat * color;
    return clamp(color, 0.0, 1.0);
}

vec3 linear_to_srgb(vec3 c) {
    return mix(c * 12.92, 1.055 * pow(c, vec3(0.41666)) - 0.055, step(vec3(0.0031308), c));
}

vec3 to_display(vec3 linear) {
    return linear_to_srgb(aces_filmic(linear));
}
"#;

const FRAGMENT_HEADER: &str = "#version 300 es\nprecision highp float;\n";

fn fragment(body: &str) -> String {
    format!("{FRAGMENT_HEADER}{OUTPUT_CHUNK}{body}")
}

pub const MESH_VERTEX: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform mat3 u_normal_matrix;

out vec3 v_world;
out vec3 v_normal;

void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    v_world = world.xyz;
    v_normal = normalize(u_normal_matrix * a_normal);
    gl_Position = u_projection * u_view * world;
}
"#;

const STANDARD_BODY: &str = r#"
#define LIGHTS 3
const float PI = 3.141592653589793;

in vec3 v_world;
in vec3 v_normal;

uniform vec3 u_camera;
uniform vec3 u_color;
uniform float u_roughness;
uniform float u_metalness;
uniform vec3 u_emissive;
uniform vec3 u_ambient;
uniform vec3 u_light_position[LIGHTS];
uniform vec3 u_light_radiance[LIGHTS];
uniform float u_light_distance[LIGHTS];
uniform float u_light_decay[LIGHTS];

out vec4 frag_color;

float distance_falloff(float d, float cutoff, float decay) {
    float f = 1.0 / max(pow(d, decay), 0.01);
    if (cutoff > 0.0) {
        float r = clamp(1.0 - pow(d / cutoff, 4.0), 0.0, 1.0);
        f *= r * r;
    }
    return f;
}

float d_ggx(float alpha, float nh) {
    float a2 = alpha * alpha;
    float d = nh * nh * (a2 - 1.0) + 1.0;
    return a2 / (PI * d * d);
}

float v_smith_correlated(float alpha, float nl, float nv) {
    float a2 = alpha * alpha;
    float gv = nl * sqrt(a2 + (1.0 - a2) * nv * nv);
    float gl = nv * sqrt(a2 + (1.0 - a2) * nl * nl);
    return 0.5 / max(gv + gl, 1e-6);
}

vec3 f_schlick(vec3 f0, float vh) {
    return f0 + (1.0 - f0) * pow(1.0 - vh, 5.0);
}

void main() {
    vec3 n = normalize(v_normal);
    if (!gl_FrontFacing) n = -n;
    vec3 v = normalize(u_camera - v_world);
    float nv = clamp(dot(n, v), 1e-4, 1.0);

    float roughness = clamp(u_roughness, 0.0525, 1.0);
    float alpha = roughness * roughness;
    vec3 diffuse = u_color * (1.0 - u_metalness);
    vec3 f0 = mix(vec3(0.04), u_color, u_metalness);

    vec3 light = u_ambient * diffuse / PI;
    for (int i = 0; i < LIGHTS; i++) {
        vec3 to_light = u_light_position[i] - v_world;
        float d = length(to_light);
        vec3 l = to_light / max(d, 1e-5);
        float nl = clamp(dot(n, l), 0.0, 1.0);
        if (nl <= 0.0) continue;
        vec3 h = normalize(l + v);
        float nh = clamp(dot(n, h), 0.0, 1.0);
        float vh = clamp(dot(v, h), 0.0, 1.0);
        vec3 irradiance = u_light_radiance[i] * distance_falloff(d, u_light_distance[i], u_light_decay[i]) * nl;
        vec3 specular = f_schlick(f0, vh) * d_ggx(alpha, nh) * v_smith_correlated(alpha, nl, nv);
        light += irradiance * (diffuse / PI + specular);
    }
    light += u_emissive;
    frag_color = vec4(to_display(light), 1.0);
}
"#;

const GLOW_BODY: &str = r#"
uniform vec3 u_color;
uniform float u_opacity;

out vec4 frag_color;

void main() {
    frag_color = vec4(to_display(u_color), u_opacity);
}
"#;

pub const POINTS_VERTEX: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_color;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_size;
uniform float u_scale;
uniform bool u_attenuate;

out vec3 v_color;

void main() {
    vec4 view_position = u_view * u_model * vec4(a_position, 1.0);
    gl_Position = u_projection * view_position;
    float size = u_size;
    if (u_attenuate) size *= u_scale / -view_position.z;
    gl_PointSize = size;
    v_color = a_color;
}
"#;

const POINTS_BODY: &str = r#"
in vec3 v_color;

uniform float u_opacity;

out vec4 frag_color;

void main() {
    frag_color = vec4(to_display(v_color), u_opacity);
}
"#;

pub fn standard_fragment() -> String {
    fragment(STANDARD_BODY)
}

pub fn glow_fragment() -> String {
    fragment(GLOW_BODY)
}

pub fn points_fragment() -> String {
    fragment(POINTS_BODY)
}

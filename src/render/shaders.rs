//! GLSL ES 3.00 sources for the flower renderer

/// ACES filmic fit, exposure and sRGB encode shared by every color pass
macro_rules! output_chunk {
    () => {
        r#"
uniform float u_exposure;

vec3 aces_filmic(vec3 color) {
    color *= u_exposure / 0.6;
    const mat3 input_mat = mat3(
        0.59719, 0.07600, 0.02840,
        0.35458, 0.90834, 0.13383,
        0.04823, 0.01566, 0.83777
    );
    const mat3 output_mat = mat3(
        1.60475, -0.10208, -0.00327,
        -0.53108, 1.10813, -0.07276,
        -0.07367, -0.00605, 1.07602
    );
    color = input_mat * color;
    vec3 a = color * (color + 0.0245786) - 0.000090537;
    vec3 b = color * (0.983729 * color + 0.4329510) + 0.238081;
    color = output_mat * (a / b);
    return clamp(color, 0.0, 1.0);
}

vec3 linear_to_srgb(vec3 color) {
    return mix(
        pow(color, vec3(0.41666)) * 1.055 - vec3(0.055),
        color * 12.92,
        vec3(lessThanEqual(color, vec3(0.0031308)))
    );
}
"#
    };
}

/// Shared by the lit and the unlit mesh passes
pub const MESH_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;

uniform mat4 u_model;
uniform mat4 u_view_projection;
uniform mat4 u_light_space;

out vec3 v_world_position;
out vec3 v_normal;
out vec4 v_shadow_coord;

void main() {
    vec4 world_pos = u_model * vec4(a_position, 1.0);

    v_world_position = world_pos.xyz;
    // Uniform scales only, so the model matrix is fine for normals
    v_normal = mat3(u_model) * a_normal;
    v_shadow_coord = u_light_space * world_pos;

    gl_Position = u_view_projection * world_pos;
}
"#;

/// Three directional lights plus ambient, clearcoat highlight, emissive term
/// and a 3x3 PCF shadow lookup on the key light
pub const LIT_FRAGMENT_SHADER: &str = concat!(
    r#"#version 300 es
precision highp float;

in vec3 v_world_position;
in vec3 v_normal;
in vec4 v_shadow_coord;

uniform vec3 u_camera_pos;
uniform vec3 u_light_dir[3];
uniform vec3 u_light_color[3];
uniform vec3 u_ambient;

uniform vec3 u_color;
uniform float u_roughness;
uniform float u_metalness;
uniform float u_clearcoat;
uniform float u_clearcoat_roughness;
uniform vec3 u_emissive;
uniform float u_emissive_intensity;

uniform sampler2D u_shadow_map;
uniform vec2 u_shadow_texel;
uniform int u_receive_shadow;

out vec4 fragColor;
"#,
    output_chunk!(),
    r#"
float shadow_factor() {
    if (u_receive_shadow == 0) {
        return 1.0;
    }
    vec3 coord = v_shadow_coord.xyz / v_shadow_coord.w * 0.5 + 0.5;
    if (coord.x < 0.0 || coord.x > 1.0 || coord.y < 0.0 || coord.y > 1.0 || coord.z > 1.0) {
        return 1.0;
    }

    float bias = 0.0015;
    float lit = 0.0;
    for (int x = -1; x <= 1; x++) {
        for (int y = -1; y <= 1; y++) {
            float depth = texture(u_shadow_map, coord.xy + vec2(x, y) * u_shadow_texel).r;
            lit += coord.z - bias > depth ? 0.0 : 1.0;
        }
    }
    return lit / 9.0;
}

float specular_lobe(vec3 n, vec3 h, float roughness) {
    float shininess = 2.0 / max(roughness * roughness * roughness * roughness, 0.001) - 2.0;
    return pow(max(dot(n, h), 0.0), shininess) * (shininess + 8.0) / 25.1327;
}

void main() {
    vec3 n = normalize(v_normal);
    vec3 view_dir = normalize(u_camera_pos - v_world_position);
    // Thin petals are seen from both sides
    if (!gl_FrontFacing) {
        n = -n;
    }

    vec3 diffuse_color = u_color * (1.0 - u_metalness);
    vec3 specular_color = mix(vec3(0.04), u_color, u_metalness);
    float shadow = shadow_factor();

    vec3 color = u_ambient * diffuse_color;
    for (int i = 0; i < 3; i++) {
        vec3 l = normalize(u_light_dir[i]);
        float n_dot_l = max(dot(n, l), 0.0);
        if (n_dot_l <= 0.0) {
            continue;
        }
        vec3 h = normalize(l + view_dir);
        vec3 radiance = u_light_color[i] * n_dot_l * (i == 0 ? shadow : 1.0);

        vec3 lobe = diffuse_color + specular_color * specular_lobe(n, h, u_roughness);
        lobe += vec3(0.04 * u_clearcoat * specular_lobe(n, h, u_clearcoat_roughness));
        color += radiance * lobe;
    }

    color += u_emissive * u_emissive_intensity;

    fragColor = vec4(linear_to_srgb(aces_filmic(color)), 1.0);
}
"#
);

/// Unlit translucent mesh (sparkles)
pub const UNLIT_FRAGMENT_SHADER: &str = concat!(
    r#"#version 300 es
precision highp float;

in vec3 v_world_position;
in vec3 v_normal;
in vec4 v_shadow_coord;

uniform vec3 u_color;
uniform float u_opacity;

out vec4 fragColor;
"#,
    output_chunk!(),
    r#"
void main() {
    fragColor = vec4(linear_to_srgb(aces_filmic(u_color)), u_opacity);
}
"#
);

/// Depth-only pass from the key light
pub const SHADOW_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;

uniform mat4 u_model;
uniform mat4 u_light_space;

void main() {
    gl_Position = u_light_space * u_model * vec4(a_position, 1.0);
}
"#;

pub const SHADOW_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

void main() {}
"#;

/// Background points with size attenuation
pub const POINTS_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in float a_size;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_size;
// Half the drawing buffer height, in pixels
uniform float u_scale;

void main() {
    vec4 mv_position = u_view * u_model * vec4(a_position, 1.0);
    gl_PointSize = u_size * a_size * (u_scale / -mv_position.z);
    gl_Position = u_projection * mv_position;
}
"#;

pub const POINTS_FRAGMENT_SHADER: &str = concat!(
    r#"#version 300 es
precision highp float;

uniform sampler2D u_sprite;
uniform float u_opacity;

out vec4 fragColor;
"#,
    output_chunk!(),
    r#"
void main() {
    vec4 texel = texture(u_sprite, gl_PointCoord);
    fragColor = vec4(linear_to_srgb(aces_filmic(texel.rgb)), texel.a * u_opacity);
}
"#
);

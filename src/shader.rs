//! GLSL ES 3.00 program pair and the full-screen quad.

/// Interleaved `position.xy, uv.xy` for a 4-vertex triangle strip.
pub const QUAD_VERTICES: [f32; 16] = [
    -1.0, -1.0, 0.0, 0.0, //
    1.0, -1.0, 1.0, 0.0, //
    -1.0, 1.0, 0.0, 1.0, //
    1.0, 1.0, 1.0, 1.0,
];

/// Bytes between consecutive vertices.
pub const QUAD_STRIDE: i32 = 16;
pub const QUAD_VERTEX_COUNT: i32 = 4;

pub const VERTEX_SHADER: &str = r#"#version 300 es
in vec2 a_position;
in vec2 a_uv;
out vec2 v_uv;

void main() {
    v_uv = a_uv;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform vec2 u_resolution;
uniform vec2 u_pointer;
uniform float u_time;
uniform float u_angle;
uniform float u_noise;
uniform float u_blind_count;
uniform float u_spot_radius;
uniform float u_spot_softness;
uniform float u_spot_opacity;
uniform float u_mirror;
uniform float u_distort;
uniform float u_shine_flip;
uniform vec3 u_colors[4];
uniform int u_color_count;

in vec2 v_uv;
out vec4 frag_color;

float hash(vec2 p) {
    return fract(sin(dot(p, vec2(12.9898, 78.233))) * 43758.5453);
}

vec2 rotate_uv(vec2 uv, float a) {
    float aspect = u_resolution.y > 0.0 ? u_resolution.x / u_resolution.y : 1.0;
    vec2 p = uv * 2.0 - 1.0;
    p.x *= aspect;
    float c = cos(a);
    float s = sin(a);
    p = mat2(c, -s, s, c) * p;
    p.x /= aspect;
    return p * 0.5 + 0.5;
}

vec3 ramp(float t) {
    int count = clamp(u_color_count, 2, 4);
    float scaled = clamp(t, 0.0, 1.0) * float(count - 1);
    float seg = floor(scaled);
    int i = int(seg);
    if (i + 1 >= count) {
        return u_colors[count - 1];
    }
    return mix(u_colors[i], u_colors[i + 1], scaled - seg);
}

void main() {
    vec2 uv0 = v_uv;
    vec2 uv = rotate_uv(uv0, u_angle);

    if (u_distort > 0.0) {
        float w = 0.01 * u_distort;
        uv = vec2(uv.x + sin(uv.y * 6.0) * w, uv.y + cos(uv.x * 6.0) * w);
    }

    float t = uv.x;
    if (u_mirror > 0.5) {
        t = 1.0 - abs(1.0 - 2.0 * fract(t));
    }
    vec3 base = ramp(t);

    float wave = sin(u_time * 0.8 + uv0.y * 3.14159265) * 0.5 + 0.5;
    float center = sin(u_time * 0.3) * 0.5 + 0.5;
    float band = 1.0 - smoothstep(0.0, 0.25, abs(uv0.y - center));
    vec3 glow = base * (1.0 + band * 0.01 * wave);

    vec2 spot_center = u_pointer / u_resolution;
    float dn = length(uv0 - spot_center) / max(u_spot_radius, 1e-4);
    float spot = (1.0 - 2.0 * pow(dn, u_spot_softness)) * u_spot_opacity;

    float stripe = fract(uv.x * max(u_blind_count, 1.0));
    if (u_shine_flip > 0.5) {
        stripe = 1.0 - stripe;
    }

    vec3 col = vec3(spot) + glow - vec3(stripe);
    col += (hash(gl_FragCoord.xy + u_time) - 0.5) * u_noise;
    frag_color = vec4(col, 1.0);
}
"#;

//! GLSL ES 3.00 sources for the scene and the post-process chain.

pub const RING_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 aPosition;
layout(location = 1) in vec2 aUv;
uniform mat4 uViewProjection;
uniform mat4 uModel;
out vec2 vUv;
void main() {
    vUv = aUv;
    gl_Position = uViewProjection * uModel * vec4(aPosition, 1.0);
}
"#;

/// Accretion swirl: domain-warped fbm, faded at both ring edges.
pub const RING_FS: &str = r#"#version 300 es
precision highp float;
uniform float uTime;
uniform float uSeed;
in vec2 vUv;
out vec4 fragColor;

float hash(vec2 p) {
    return fract(sin(dot(p, vec2(12.9898, 78.233))) * 43758.5453123);
}

float noise(vec2 p) {
    vec2 i = floor(p);
    vec2 f = fract(p);
    vec2 u = f * f * (3.0 - 2.0 * f);
    return mix(mix(hash(i), hash(i + vec2(1.0, 0.0)), u.x),
               mix(hash(i + vec2(0.0, 1.0)), hash(i + vec2(1.0, 1.0)), u.x), u.y);
}

float fbm(vec2 p) {
    float value = 0.0;
    float amplitude = 0.5;
    for (int i = 0; i < 6; i++) {
        value += amplitude * noise(p);
        p *= 2.0;
        amplitude *= 0.5;
    }
    return value;
}

void main() {
    float radius = vUv.x;
    float angle = vUv.y * 6.28318;
    float alpha = smoothstep(0.0, 0.1, radius) * (1.0 - smoothstep(0.9, 1.0, radius));

    vec2 p = vec2(angle + uSeed, radius * 2.0 + uSeed);
    vec2 q = vec2(fbm(p + uTime * 0.1), fbm(p + vec2(2.0)));
    vec2 r = vec2(fbm(p + q * 1.5 + uTime * 0.15), fbm(p + q * 1.5 + vec2(3.2)));
    float swirl = fbm(p + r);

    vec3 color = mix(vec3(1.0, 0.85, 0.7), vec3(1.0, 0.5, 0.1), swirl);
    fragColor = vec4(color, alpha);
}
"#;

pub const SOLID_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 aPosition;
uniform mat4 uViewProjection;
uniform mat4 uModel;
void main() {
    gl_Position = uViewProjection * uModel * vec4(aPosition, 1.0);
}
"#;

pub const SOLID_FS: &str = r#"#version 300 es
precision mediump float;
uniform vec3 uColor;
out vec4 fragColor;
void main() {
    fragColor = vec4(uColor, 1.0);
}
"#;

pub const STAR_VS: &str = r#"#version 300 es
layout(location = 0) in vec3 aPosition;
uniform mat4 uView;
uniform mat4 uProjection;
uniform float uSize;
uniform float uScale;
void main() {
    vec4 mv = uView * vec4(aPosition, 1.0);
    gl_PointSize = uSize * (uScale / -mv.z);
    gl_Position = uProjection * mv;
}
"#;

pub const STAR_FS: &str = r#"#version 300 es
precision mediump float;
out vec4 fragColor;
void main() {
    fragColor = vec4(1.0);
}
"#;

/// Single oversized triangle covering the viewport, no vertex buffer needed.
pub const FULLSCREEN_VS: &str = r#"#version 300 es
out vec2 vUv;
void main() {
    vec2 p = vec2(float((gl_VertexID << 1) & 2), float(gl_VertexID & 2));
    vUv = p;
    gl_Position = vec4(p * 2.0 - 1.0, 0.0, 1.0);
}
"#;

/// Gravitational-lens pull towards the screen centre with a slight swirl.
pub const DISTORTION_FS: &str = r#"#version 300 es
precision highp float;
uniform sampler2D tDiffuse;
uniform float uStrength;
uniform float uTime;
in vec2 vUv;
out vec4 fragColor;
void main() {
    vec2 center = vec2(0.5);
    vec2 uv = vUv;
    float dist = distance(uv, center);
    float falloff = smoothstep(0.8, 0.15, dist);
    float strength = pow(falloff, 2.0) * uStrength * (1.0 + 0.05 * sin(uTime));
    vec2 direction = dist > 0.0 ? normalize(center - uv) : vec2(0.0);
    vec2 swirl = vec2(-direction.y, direction.x);
    uv += direction * strength + swirl * strength * 0.35;
    fragColor = texture(tDiffuse, uv);
}
"#;

pub const BRIGHT_FS: &str = r#"#version 300 es
precision mediump float;
uniform sampler2D tDiffuse;
uniform float uThreshold;
in vec2 vUv;
out vec4 fragColor;
void main() {
    vec4 c = texture(tDiffuse, vUv);
    float luma = dot(c.rgb, vec3(0.299, 0.587, 0.114));
    fragColor = vec4(c.rgb * smoothstep(uThreshold, uThreshold + 0.01, luma), 1.0);
}
"#;

/// 9-tap separable gaussian; `uDirection` is one texel step along an axis.
pub const BLUR_FS: &str = r#"#version 300 es
precision mediump float;
uniform sampler2D tDiffuse;
uniform vec2 uDirection;
in vec2 vUv;
out vec4 fragColor;
void main() {
    float w[5] = float[](0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);
    vec3 sum = texture(tDiffuse, vUv).rgb * w[0];
    for (int i = 1; i < 5; i++) {
        vec2 off = uDirection * float(i);
        sum += texture(tDiffuse, vUv + off).rgb * w[i];
        sum += texture(tDiffuse, vUv - off).rgb * w[i];
    }
    fragColor = vec4(sum, 1.0);
}
"#;

pub const COMPOSITE_FS: &str = r#"#version 300 es
precision mediump float;
uniform sampler2D tDiffuse;
uniform sampler2D tBloom;
uniform float uStrength;
in vec2 vUv;
out vec4 fragColor;
void main() {
    vec4 base = texture(tDiffuse, vUv);
    vec3 bloom = texture(tBloom, vUv).rgb * uStrength;
    fragColor = vec4(base.rgb + bloom, base.a);
}
"#;

pub const INVERT_FS: &str = r#"#version 300 es
precision mediump float;
uniform sampler2D tDiffuse;
uniform float uIntensity;
in vec2 vUv;
out vec4 fragColor;
void main() {
    vec4 c = texture(tDiffuse, vUv);
    vec3 rgb = clamp(c.rgb, 0.0, 1.0);
    fragColor = vec4(mix(rgb, vec3(1.0) - rgb, uIntensity), 1.0);
}
"#;

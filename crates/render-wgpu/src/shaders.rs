/// WGSL shader drawing each point as a camera-facing quad.
///
/// Positions and colors arrive as two per-instance `vec3<f32>` streams; the
/// six quad corners come from the vertex index.
pub const POINT_SHADER: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
};

struct Points {
    // x: size, y: 1.0 if size shrinks with distance, z: viewport height
    style: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0)
var<uniform> points: Points;

struct PointInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) corner: vec2<f32>,
};

var<private> CORNERS: array<vec2<f32>, 6> = array<vec2<f32>, 6>(
    vec2<f32>(-1.0, -1.0),
    vec2<f32>( 1.0, -1.0),
    vec2<f32>( 1.0,  1.0),
    vec2<f32>(-1.0, -1.0),
    vec2<f32>( 1.0,  1.0),
    vec2<f32>(-1.0,  1.0),
);

@vertex
fn vs_points(@builtin(vertex_index) vertex_index: u32, point: PointInput) -> VertexOutput {
    let corner = CORNERS[vertex_index];
    let half_size = points.style.x * 0.5;
    var view_pos = camera.view * vec4<f32>(point.position, 1.0);

    var out: VertexOutput;
    if (points.style.y > 0.5) {
        view_pos = vec4<f32>(view_pos.xy + corner * half_size, view_pos.zw);
        out.clip_position = camera.proj * view_pos;
    } else {
        // Fixed size in pixels.
        let clip = camera.proj * view_pos;
        let offset = corner * half_size * 2.0 / points.style.z;
        out.clip_position = vec4<f32>(clip.xy + offset * clip.w, clip.zw);
    }
    out.color = point.color;
    out.corner = corner;
    return out;
}

@fragment
fn fs_points(in: VertexOutput) -> @location(0) vec4<f32> {
    let d = length(in.corner);
    if (d > 1.0) {
        discard;
    }
    let alpha = 1.0 - smoothstep(0.6, 1.0, d);
    return vec4<f32>(in.color * alpha, alpha);
}
"#;

/// WGSL shader for the axes helper lines.
pub const AXES_SHADER: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct LineVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_axes(vertex: LineVertex) -> LineOutput {
    var out: LineOutput;
    out.clip_position = camera.proj * camera.view * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_axes(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

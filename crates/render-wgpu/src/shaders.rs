/// WGSL shader for matcap-shaded instanced meshes.
///
/// Group 0 holds the camera, group 1 the material's matcap texture. The
/// view-space normal is projected onto a basis facing the view direction,
/// so the matcap does not swim towards the edges of a perspective view.
pub const MATCAP_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0)
var matcap: texture_2d<f32>;
@group(1) @binding(1)
var matcap_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) view_position: vec3<f32>,
    @location(1) view_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    // Scales are uniform, so the model matrix carries normals unchanged.
    let view_normal = (camera.view * model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = camera.view_proj * world_pos;
    out.view_position = (camera.view * world_pos).xyz;
    out.view_normal = view_normal;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(in.view_normal);
    let view_dir = normalize(-in.view_position);
    let x = normalize(vec3<f32>(view_dir.z, 0.0, -view_dir.x));
    let y = cross(view_dir, x);
    let uv = vec2<f32>(dot(x, normal), dot(y, normal)) * 0.495 + 0.5;
    let color = textureSample(matcap, matcap_sampler, vec2<f32>(uv.x, 1.0 - uv.y));
    return vec4<f32>(color.rgb, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_points_present() {
        assert!(MATCAP_SHADER.contains("fn vs_main"));
        assert!(MATCAP_SHADER.contains("fn fs_main"));
    }

    #[test]
    fn instance_locations_follow_vertex_attributes() {
        for location in 0..6 {
            assert!(MATCAP_SHADER.contains(&format!("@location({location})")));
        }
    }
}

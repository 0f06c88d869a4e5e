
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, HtmlCanvasElement, HtmlElement, WebGl2RenderingContext as GL, WebGlBuffer,
    WebGlProgram, WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::error::{CapabilityUnavailable, SetupStage};
use crate::lifecycle::RenderBackend;
use crate::resize::ContainerSize;
use crate::shader::{QUAD_STRIDE, QUAD_VERTEX_COUNT};
use crate::uniforms::{names, SurfaceSize, UniformSurface};

pub(crate) fn js_reason(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// Cached uniform locations. Uniforms the driver optimised out stay `None`.
struct UniformLocations {
    resolution: Option<WebGlUniformLocation>,
    pointer: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    angle: Option<WebGlUniformLocation>,
    noise: Option<WebGlUniformLocation>,
    blind_count: Option<WebGlUniformLocation>,
    spot_radius: Option<WebGlUniformLocation>,
    spot_softness: Option<WebGlUniformLocation>,
    spot_opacity: Option<WebGlUniformLocation>,
    mirror: Option<WebGlUniformLocation>,
    distort: Option<WebGlUniformLocation>,
    shine_flip: Option<WebGlUniformLocation>,
    colors: Option<WebGlUniformLocation>,
    color_count: Option<WebGlUniformLocation>,
}

impl UniformLocations {
    fn lookup(gl: &GL, program: &WebGlProgram) -> Self {
        let at = |name| gl.get_uniform_location(program, name);
        Self {
            resolution: at(names::RESOLUTION),
            pointer: at(names::POINTER),
            time: at(names::TIME),
            angle: at(names::ANGLE),
            noise: at(names::NOISE),
            blind_count: at(names::BLIND_COUNT),
            spot_radius: at(names::SPOT_RADIUS),
            spot_softness: at(names::SPOT_SOFTNESS),
            spot_opacity: at(names::SPOT_OPACITY),
            mirror: at(names::MIRROR),
            distort: at(names::DISTORT),
            shine_flip: at(names::SHINE_FLIP),
            colors: at(names::COLORS),
            color_count: at(names::COLOR_COUNT),
        }
    }
}

/// Full-viewport WebGL2 canvas inserted behind the page content.
pub struct GlBackend {
    document: Document,
    container: HtmlElement,
    layer_opacity: f32,
    blend_mode: String,
    canvas: Option<HtmlCanvasElement>,
    gl: Option<GL>,
    program: Option<WebGlProgram>,
    vao: Option<WebGlVertexArrayObject>,
    buffer: Option<WebGlBuffer>,
    locations: Option<UniformLocations>,
}

impl GlBackend {
    pub fn new(document: Document, container: HtmlElement, layer_opacity: f32, blend_mode: &str) -> Self {
        Self {
            document,
            container,
            layer_opacity,
            blend_mode: blend_mode.to_string(),
            canvas: None,
            gl: None,
            program: None,
            vao: None,
            buffer: None,
            locations: None,
        }
    }

    pub fn canvas(&self) -> Option<&HtmlCanvasElement> {
        self.canvas.as_ref()
    }

    fn context(&self, stage: SetupStage) -> Result<&GL, CapabilityUnavailable> {
        self.gl.as_ref().ok_or_else(|| stage.fail("no rendering context"))
    }

    fn create_canvas(&self) -> Result<HtmlCanvasElement, JsValue> {
        let canvas: HtmlCanvasElement = self
            .document
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("created element is not a canvas"))?;
        let style = canvas.style();
        let opacity = self.layer_opacity.clamp(0.0, 1.0).to_string();
        for (key, value) in [
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("z-index", "-1"),
            ("display", "block"),
            ("pointer-events", "none"),
            ("opacity", opacity.as_str()),
            ("mix-blend-mode", self.blend_mode.as_str()),
        ] {
            style.set_property(key, value)?;
        }
        Ok(canvas)
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, CapabilityUnavailable> {
    let stage = SetupStage::CompileShader;
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| stage.fail("unable to create shader object"))?;
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
        gl.delete_shader(Some(&shader));
        Err(stage.fail(info))
    }
}

impl RenderBackend for GlBackend {
    fn acquire_surface(&mut self) -> Result<(), CapabilityUnavailable> {
        let stage = SetupStage::AcquireSurface;
        let canvas = self.create_canvas().map_err(|e| stage.fail(js_reason(&e)))?;
        let gl: GL = canvas
            .get_context("webgl2")
            .map_err(|e| stage.fail(js_reason(&e)))?
            .ok_or_else(|| stage.fail("WebGL2 not supported"))?
            .dyn_into()
            .map_err(|_| stage.fail("context is not WebGL2"))?;

        self.container
            .append_child(&canvas)
            .map_err(|e| stage.fail(js_reason(&e)))?;
        self.canvas = Some(canvas);
        self.gl = Some(gl);
        Ok(())
    }

    fn compile_program(&mut self, vertex: &str, fragment: &str) -> Result<(), CapabilityUnavailable> {
        let gl = self.context(SetupStage::CompileShader)?;
        let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
        let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;

        let stage = SetupStage::LinkProgram;
        let program = gl
            .create_program()
            .ok_or_else(|| stage.fail("unable to create program object"))?;
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
            gl.delete_program(Some(&program));
            return Err(stage.fail(info));
        }

        let locations = UniformLocations::lookup(gl, &program);
        self.locations = Some(locations);
        self.program = Some(program);
        Ok(())
    }

    fn upload_quad(&mut self, vertices: &[f32]) -> Result<(), CapabilityUnavailable> {
        let stage = SetupStage::UploadGeometry;
        let gl = self.context(stage)?;
        let program = self.program.as_ref().ok_or_else(|| stage.fail("program not linked"))?;

        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| stage.fail("unable to create vertex array"))?;
        gl.bind_vertex_array(Some(&vao));

        let buffer = gl
            .create_buffer()
            .ok_or_else(|| stage.fail("unable to create buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let data = js_sys::Float32Array::from(vertices);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STATIC_DRAW);

        for (name, offset) in [("a_position", 0), ("a_uv", 8)] {
            let location = gl.get_attrib_location(program, name);
            if location < 0 {
                return Err(stage.fail(format!("attribute {name} not found")));
            }
            let location = location as u32;
            gl.enable_vertex_attrib_array(location);
            gl.vertex_attrib_pointer_with_i32(location, 2, GL::FLOAT, false, QUAD_STRIDE, offset);
        }

        self.vao = Some(vao);
        self.buffer = Some(buffer);
        Ok(())
    }

    fn resize_surface(&mut self, container: ContainerSize) -> SurfaceSize {
        let (Some(canvas), Some(gl)) = (&self.canvas, &self.gl) else {
            return SurfaceSize::default();
        };
        let (width, height) = container.buffer_dims();
        canvas.set_width(width);
        canvas.set_height(height);
        let (bw, bh) = (gl.drawing_buffer_width(), gl.drawing_buffer_height());
        gl.viewport(0, 0, bw, bh);
        SurfaceSize::new(bw as f32, bh as f32)
    }

    fn write_uniforms(&mut self, u: &UniformSurface) {
        let (Some(gl), Some(program), Some(loc)) = (&self.gl, &self.program, &self.locations) else {
            return;
        };
        let p = &u.params;
        gl.use_program(Some(program));
        gl.uniform2f(loc.resolution.as_ref(), u.resolution[0], u.resolution[1]);
        gl.uniform2f(loc.pointer.as_ref(), u.pointer[0], u.pointer[1]);
        gl.uniform1f(loc.time.as_ref(), u.time);
        gl.uniform1f(loc.angle.as_ref(), p.angle);
        gl.uniform1f(loc.noise.as_ref(), p.noise);
        gl.uniform1f(loc.blind_count.as_ref(), u.blind_count);
        gl.uniform1f(loc.spot_radius.as_ref(), p.spot_radius);
        gl.uniform1f(loc.spot_softness.as_ref(), p.spot_softness);
        gl.uniform1f(loc.spot_opacity.as_ref(), p.spot_opacity);
        gl.uniform1f(loc.mirror.as_ref(), if p.mirror { 1.0 } else { 0.0 });
        gl.uniform1f(loc.distort.as_ref(), p.distort);
        gl.uniform1f(loc.shine_flip.as_ref(), if p.shine_flip { 1.0 } else { 0.0 });
        gl.uniform3fv_with_f32_array(loc.colors.as_ref(), &u.color_data());
        gl.uniform1i(loc.color_count.as_ref(), p.ramp.count() as i32);
    }

    fn draw(&mut self) {
        let (Some(gl), Some(vao)) = (&self.gl, &self.vao) else {
            return;
        };
        gl.bind_vertex_array(Some(vao));
        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, QUAD_VERTEX_COUNT);
    }

    fn release(&mut self) {
        if let Some(gl) = &self.gl {
            gl.use_program(None);
            gl.bind_vertex_array(None);
            gl.delete_vertex_array(self.vao.take().as_ref());
            gl.delete_buffer(self.buffer.take().as_ref());
            gl.delete_program(self.program.take().as_ref());
        }
        self.locations = None;
        self.gl = None;
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
        }
    }
}

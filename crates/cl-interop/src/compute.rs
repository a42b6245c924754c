//! Kernel loading and the compute half of the frame protocol.

use ocl::{Kernel, Program};
use tracer_core::{load_kernel_source, ComputeStage, Result, TracerConfig, TracerError};
use tracing::{debug, info};

use crate::context::SharedContext;
use crate::shared::SharedMem;

/// Name of the animation argument (kernel argument 3).
const PHASE_ARG: &str = "phase";

/// Build `source` for the context's device.
///
/// A failed build carries the compiler's build log.
pub fn build_program(ctx: &SharedContext, source: &str) -> Result<Program> {
    Program::builder()
        .src(source)
        .devices(ctx.device())
        .build(ctx.context())
        .map_err(|e| TracerError::KernelBuild { log: e.to_string() })
}

/// Create the kernel with its constant arguments bound:
/// 0 = shared memory, 1 = width, 2 = height, 3 = phase.
fn create_kernel(
    ctx: &SharedContext,
    program: &Program,
    name: &str,
    mem: &SharedMem,
    width: u32,
    height: u32,
) -> Result<Kernel> {
    let mut builder = Kernel::builder();
    builder
        .program(program)
        .name(name)
        .queue(ctx.queue().clone())
        .global_work_size([width as usize, height as usize]);

    match mem {
        SharedMem::Texture(image) => builder.arg(image),
        SharedMem::Buffer(buf) => builder.arg(buf),
    };

    builder
        .arg(width)
        .arg(height)
        .arg_named(PHASE_ARG, 0.0f32)
        .build()
        .map_err(|e| TracerError::KernelBuild {
            log: format!("kernel `{name}`: {e}"),
        })
}

/// The compute side of one shared resource: queue, kernel and the wrapped
/// GL object.
///
/// Drop this before the GL object it wraps.
pub struct InteropCompute {
    mem: SharedMem,
    kernel: Kernel,
    ctx: SharedContext,
}

impl InteropCompute {
    /// Load and build the kernel from `cfg.kernel_path`, wrap the GL object
    /// `gl_name` and bind the constant kernel arguments.
    pub fn new(ctx: SharedContext, cfg: &TracerConfig, gl_name: u32) -> Result<Self> {
        let source = load_kernel_source(&cfg.kernel_path, cfg.max_source_size)?;
        let program = build_program(&ctx, &source)?;
        debug!(path = %cfg.kernel_path.display(), "kernel program built");

        let mem = SharedMem::from_gl(ctx.queue(), cfg.resource, gl_name, cfg.width, cfg.height)?;
        let kernel = create_kernel(&ctx, &program, &cfg.kernel_name, &mem, cfg.width, cfg.height)?;

        info!(kernel = %cfg.kernel_name, resource = ?mem.kind(), "compute stage ready");
        Ok(Self { mem, kernel, ctx })
    }
}

impl ComputeStage for InteropCompute {
    fn acquire(&mut self) -> Result<()> {
        self.mem.acquire()
    }

    fn set_phase(&mut self, phase: f32) -> Result<()> {
        self.kernel
            .set_arg(PHASE_ARG, phase)
            .map_err(|e| TracerError::compute(format!("set phase: {e}")))
    }

    fn dispatch(&mut self, width: u32, height: u32) -> Result<()> {
        let enqueued = unsafe {
            self.kernel
                .cmd()
                .global_work_size([width as usize, height as usize])
                .enq()
        };
        enqueued.map_err(|e| TracerError::compute(format!("enqueue kernel: {e}")))
    }

    fn release(&mut self) -> Result<()> {
        self.mem.release()
    }

    fn finish(&mut self) -> Result<()> {
        self.ctx
            .queue()
            .finish()
            .map_err(|e| TracerError::compute(format!("finish: {e}")))
    }
}

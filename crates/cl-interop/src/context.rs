//! OpenCL context and queue sharing the current OpenGL context.

use ocl::{Context, Device, Platform, Queue};
use tracer_core::{Result, Selection, TracerError};
use tracing::info;

use crate::probe::device_label;

/// A CL context bound to the current GL context, with one in-order queue on
/// the selected device.
pub struct SharedContext {
    context: Context,
    queue: Queue,
    device: Device,
}

impl SharedContext {
    /// Create the shared context for `selection`.
    ///
    /// The GL context that should share memory with OpenCL must be current on
    /// the calling thread.
    pub fn create(selection: &Selection<Platform, Device>) -> Result<Self> {
        let properties = ocl_interop::get_properties_list();

        let context = Context::builder()
            .properties(properties)
            .platform(selection.platform)
            .devices(selection.device)
            .build()
            .map_err(|e| TracerError::interop(format!("shared context: {e}")))?;

        let queue = Queue::new(&context, selection.device, None)
            .map_err(|e| TracerError::interop(format!("command queue: {e}")))?;

        info!(
            platform = selection.platform_index,
            device = selection.device_index,
            name = %device_label(selection.device),
            "CL/GL shared context created"
        );

        Ok(Self {
            context,
            queue,
            device: selection.device,
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn device(&self) -> Device {
        self.device
    }
}

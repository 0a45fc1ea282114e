/// A descriptor for a 2-D convolution kernel in
/// (groups, output channels, input channels, height, width)-order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConvKernelShape {
    groups: usize,
    out_channels: usize,
    in_channels: usize,
    kernel_h: usize,
    kernel_w: usize,
}

/// A descriptor for spectrogram input: `freq_bins` rows of `frames` values.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpectrogramGeometry {
    freq_bins: usize,
    frames: usize,
}

impl ConvKernelShape {
    pub fn new(out_channels: usize, in_channels: usize, kernel_h: usize, kernel_w: usize) -> Self {
        ConvKernelShape {
            groups: 1,
            out_channels,
            in_channels,
            kernel_h,
            kernel_w,
        }
    }
    pub fn out_channels(&self) -> usize {
        self.out_channels
    }
    pub fn in_channels(&self) -> usize {
        self.in_channels
    }
    pub fn kernel_h(&self) -> usize {
        self.kernel_h
    }
    pub fn kernel_w(&self) -> usize {
        self.kernel_w
    }
    /// Number of weights for a single output channel.
    pub fn filter_elems(&self) -> usize {
        self.in_channels * self.kernel_h * self.kernel_w
    }
    pub fn num_elems(&self) -> usize {
        self.groups * self.out_channels * self.filter_elems()
    }
    pub fn as_tuple(&self) -> (usize, usize, usize, usize, usize) {
        (
            self.groups,
            self.out_channels,
            self.in_channels,
            self.kernel_h,
            self.kernel_w,
        )
    }
}

impl SpectrogramGeometry {
    pub fn new(freq_bins: usize, frames: usize) -> SpectrogramGeometry {
        SpectrogramGeometry { freq_bins, frames }
    }
    /// Infers the number of frames from a flat input of `len` values.
    /// Returns `None` if `len` is not a whole number of frames.
    pub fn from_len(freq_bins: usize, len: usize) -> Option<SpectrogramGeometry> {
        if freq_bins == 0 || len % freq_bins != 0 {
            return None;
        }
        Some(SpectrogramGeometry::new(freq_bins, len / freq_bins))
    }
    pub fn freq_bins(&self) -> usize {
        self.freq_bins
    }
    pub fn frames(&self) -> usize {
        self.frames
    }
    pub fn num_elems(&self) -> usize {
        self.freq_bins * self.frames
    }
}

/// Number of output frames of a convolution sliding along time.
pub fn conv_output_frames(frames: usize, kernel_w: usize, stride: usize, pad: usize) -> usize {
    let padded = frames + 2 * pad;
    if padded < kernel_w || stride == 0 {
        return 0;
    }
    (padded - kernel_w) / stride + 1
}

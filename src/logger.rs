use crate::image::header::BitmapHeader;

#[ctor::ctor]
fn init() {
    // without a config file logging stays disabled
    let _ = log4rs::init_file("log4rs.yaml", Default::default());
}

pub fn log_header(action: &str, header: &BitmapHeader) {
    log::debug!(
        "{} bitmap header: {}x{}, {} bpp, compression {}, data offset {}, data size {}, file size {}",
        action,
        header.width,
        header.height,
        header.bits_per_pixel,
        header.compression,
        header.data_offset,
        header.data_size,
        header.file_size
    );
}

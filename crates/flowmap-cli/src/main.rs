use argh::FromArgs;
use std::path::PathBuf;

use flowmap_image::Image;
use flowmap_io::{exr, functional as F, png};
use flowmap_warp::{flow, warp_by_flow, ExecutionStrategy};

#[derive(FromArgs)]
/// Warp a base image by an angle/magnitude encoded optical flow field.
struct Args {
    /// path to the base image to apply the flow to
    #[argh(positional)]
    base_image_path: PathBuf,

    /// path to the flow-encoded image in the .exr format
    #[argh(positional)]
    flow_image_path: PathBuf,

    /// path to the output image
    #[argh(positional)]
    output_image_path: PathBuf,

    /// run the resampling on all cores
    #[argh(switch, short = 'a')]
    accelerated: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let strategy = if args.accelerated {
        ExecutionStrategy::ParallelRows
    } else {
        ExecutionStrategy::Serial
    };

    // read the base image as float rgb
    let base_image = F::read_image_any_rgb8(&args.base_image_path)?;
    log::debug!("loaded base image {}", base_image.size());
    let base_image = base_image.to_f32();

    // read the flow-encoded exr and decode it into a flow field
    let flow_image = exr::read_image_exr_rgb32f(&args.flow_image_path)?;
    log::debug!("loaded flow image {}", flow_image.size());
    let flow_field = flow::flow_from_rgb(&flow_image)?;

    // warp the base image by the flow field
    let mut warped = Image::<f32, 3>::from_size_val(base_image.size(), 0.0)?;
    warp_by_flow(&base_image, &mut warped, &flow_field, strategy)?;

    // clamp to u8 and write out
    png::write_image_png_rgb8(&args.output_image_path, &warped.to_dtype::<u8>())?;
    log::info!("wrote {}", args.output_image_path.display());

    Ok(())
}

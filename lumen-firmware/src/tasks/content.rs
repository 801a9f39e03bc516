//! Display content task
//!
//! Renders the configured message, either as a right-to-left marquee or
//! as fixed text, and pushes every frame to the chain.

use defmt::*;
use embassy_time::{Duration, Ticker};

use lumen_core::config::{ContentConfig, ContentMode};
use lumen_core::scroll::Scroller;
use lumen_core::text::string_width;
use lumen_drivers::max7219::{DriverError, Max7219};

use crate::bus::{BusError, SharedBus};

#[embassy_executor::task]
pub async fn content_task(mut display: Max7219<SharedBus>, content: ContentConfig) {
    info!("Content task started ({:?})", content.mode);

    match content.mode {
        ContentMode::Scroll => scroll(&mut display, &content).await,
        ContentMode::Fixed => fixed(&mut display, &content).await,
    }
}

async fn scroll(display: &mut Max7219<SharedBus>, content: &ContentConfig) -> ! {
    let message = content.message.as_str();
    let mut scroller = Scroller::new(display.framebuffer().width(), string_width(message));
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(content.scroll_delay_ms)));

    loop {
        display
            .framebuffer_mut()
            .draw_string(scroller.position(), message);
        report(display.refresh(), display.fault_count());
        scroller.advance();

        ticker.next().await;
    }
}

async fn fixed(display: &mut Max7219<SharedBus>, content: &ContentConfig) -> ! {
    let offset = i32::from(content.fixed_offset);
    display
        .framebuffer_mut()
        .draw_string(offset, content.message.as_str());

    // Re-send periodically so a glitched chip recovers without a reset
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(content.refresh_ms)));
    loop {
        report(display.refresh(), display.fault_count());
        ticker.next().await;
    }
}

fn report(result: Result<(), DriverError<BusError>>, faults: u32) {
    if let Err(e) = result {
        warn!("Display refresh abandoned: {:?} ({} faults so far)", e, faults);
    }
}

//! `pinpoint locate`: device position to address.

use std::sync::Arc;

use anyhow::Result;

use super::args::DeviceArgs;
use super::common;
use crate::actor::{SessionMsg, SessionSnapshot};
use crate::config::AppConfig;

pub fn run_locate(config: &Arc<AppConfig>, device: &DeviceArgs) -> Result<()> {
    let rt = common::runtime()?;
    rt.block_on(async {
        let mut session = common::coordinator(config, device.geolocator())?.spawn();
        session.handle.send(SessionMsg::Start).await;

        let frame = common::wait_for(&mut session, SessionSnapshot::is_settled).await?;
        common::finish(session, frame, config.api.timeout()).await
    })
}

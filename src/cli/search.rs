//! `pinpoint search`: explicit submit of a typed address.

use std::sync::Arc;

use anyhow::{Result, bail};

use super::common;
use crate::actor::SessionMsg;
use crate::config::AppConfig;
use crate::device::Unsupported;

pub fn run_search(config: &Arc<AppConfig>, address: &str) -> Result<()> {
    if address.trim().is_empty() {
        bail!("address is empty");
    }

    let rt = common::runtime()?;
    rt.block_on(async {
        let mut session = common::coordinator(config, Arc::new(Unsupported))?.spawn();
        let handle = session.handle.clone();
        handle.send(SessionMsg::ManualInput).await;
        handle.type_text(address).await;
        handle.send(SessionMsg::Submit).await;

        // the submission is complete once loading has been asserted and cleared
        let mut started = false;
        let frame = common::wait_for(&mut session, |frame| {
            started |= frame.loading;
            started && !frame.loading
        })
        .await?;
        common::finish(session, frame, config.api.timeout()).await
    })
}

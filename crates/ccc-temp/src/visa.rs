//! VISA sessions through the system VISA library.

use std::ffi::CString;
use std::io::{BufRead, BufReader, Write};
use std::time::Duration;

use ccc_core::errors::{CccError, ErrorInfo};
use log::debug;
use visa_rs::prelude::*;

use crate::instrument::Instrument;

fn visa_error(code: &str, err: impl ToString, resource: &str) -> CccError {
    CccError::Instrument(ErrorInfo::new(code, err.to_string()).with_context("resource", resource))
}

fn resource_id(resource: &str) -> Result<ResID, CccError> {
    let name = CString::new(resource).map_err(|err| {
        CccError::Config(
            ErrorInfo::new("ccc_temp.address", err.to_string()).with_context("address", resource),
        )
    })?;
    Ok(name.into())
}

/// Lists the instrument resources the VISA library can see.
pub fn list_resources() -> Result<Vec<String>, CccError> {
    let rm = DefaultRM::new().map_err(|err| visa_error("ccc_temp.visa", err, "?*INSTR"))?;
    let mut list = rm
        .find_res_list(&resource_id("?*INSTR")?)
        .map_err(|err| visa_error("ccc_temp.visa", err, "?*INSTR"))?;
    let mut found = Vec::new();
    while let Some(name) = list
        .find_next()
        .map_err(|err| visa_error("ccc_temp.visa", err, "?*INSTR"))?
    {
        found.push(CString::from(name).to_string_lossy().into_owned());
    }
    Ok(found)
}

/// A VISA message-based session.
pub struct VisaInstrument {
    resource: String,
    // Keeps the resource manager alive for the session's lifetime.
    _rm: DefaultRM,
    session: visa_rs::Instrument,
}

impl VisaInstrument {
    /// Opens `resource` through the default resource manager.
    pub fn open(resource: &str, timeout: Duration) -> Result<Self, CccError> {
        let rm = DefaultRM::new().map_err(|err| visa_error("ccc_temp.visa", err, resource))?;
        let session = rm
            .open(&resource_id(resource)?, AccessMode::NO_LOCK, timeout)
            .map_err(|err| visa_error("ccc_temp.connect", err, resource))?;
        debug!("opened VISA session {resource}");
        Ok(Self {
            resource: resource.to_string(),
            _rm: rm,
            session,
        })
    }
}

impl Instrument for VisaInstrument {
    fn query(&mut self, command: &str) -> Result<String, CccError> {
        debug!("{} <- {command}", self.resource);
        (&self.session)
            .write_all(format!("{command}\n").as_bytes())
            .map_err(|err| visa_error("ccc_temp.write", err, &self.resource))?;
        let mut line = String::new();
        {
            let mut reader = BufReader::new(&self.session);
            reader
                .read_line(&mut line)
                .map_err(|err| visa_error("ccc_temp.read", err, &self.resource))?;
        }
        let response = line.trim().to_string();
        debug!("{} -> {response}", self.resource);
        Ok(response)
    }

    fn resource(&self) -> &str {
        &self.resource
    }
}

//! D-Bus proxy interfaces for the native provisioning runtime.
//!
//! This module contains the low-level proxy definition used to reach the
//! provisioning daemon over the bus.

mod provisioning;

pub(crate) use provisioning::EspProvisioningProxy;

//! ReGIR kernels.
//!
//! Each module exposes a `main()` which processes exactly one work item (a
//! single light slot, shading point or cell access); the host is responsible
//! for dispatching those over all items, in any order and on any number of
//! threads.

pub mod build_cell_reservoirs;
pub mod build_cell_reservoirs_and_temporal_reuse;
pub mod resample_cell;
pub mod update_last_access;

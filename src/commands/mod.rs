pub mod backup;
pub mod completions;
pub mod exec;
pub mod install;
pub mod list;
pub mod restore;
pub mod search;
pub mod self_update;
pub mod set_manager;
pub mod uninstall;
pub mod update;

#[cfg(test)]
pub(crate) mod test_support;

// tests/core/mod.rs

#[cfg(test)]
mod leaf;
#[cfg(test)]
mod node;
#[cfg(test)]
mod path;
#[cfg(test)]
mod walk;

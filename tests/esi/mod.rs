mod assets;
mod universe;


mod notes;
mod trash;

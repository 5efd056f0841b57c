mod file_resolver;
mod support;
mod uri_resolver;

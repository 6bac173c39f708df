mod helpers;
mod test_convert;
mod test_converters;
mod test_init;

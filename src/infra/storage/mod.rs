pub mod cloudinary_storage;

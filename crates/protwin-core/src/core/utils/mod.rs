pub mod residue_classes;

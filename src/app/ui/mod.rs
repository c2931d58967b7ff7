mod canvas;
mod controls;
mod legend;
mod panels;
